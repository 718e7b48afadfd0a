//! Single-use clarification requests for ambiguous queries

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use krishi_voice_core::Language;

/// A clarification awaiting the farmer's choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingDisambiguation {
    pub query: String,
    pub options: Vec<String>,
    pub language: Language,
}

/// Outcome of resolving a clarification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub selected_option: String,
    pub confidence: f32,
}

/// Issues and resolves clarification requests keyed by confirmation id
///
/// Every record is single-use: resolution removes it in the same lock
/// acquisition that finds it, so concurrent resolves on one id yield exactly
/// one success.
#[derive(Debug, Default)]
pub struct DisambiguationHandler {
    pending: Mutex<HashMap<String, PendingDisambiguation>>,
}

impl DisambiguationHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a pending clarification and return its confirmation id
    pub fn create(&self, query: &str, options: Vec<String>, language: Language) -> String {
        let confirmation_id = Uuid::new_v4().to_string();
        self.pending.lock().insert(
            confirmation_id.clone(),
            PendingDisambiguation {
                query: query.to_string(),
                options,
                language,
            },
        );
        confirmation_id
    }

    /// Resolve a pending clarification.
    ///
    /// Unknown or already-resolved ids return `None` with no side effect.
    /// A selection from the offered options scores `1/len(options)`; any
    /// other selection scores 0.5.
    pub fn resolve(&self, confirmation_id: &str, selected_option: &str) -> Option<Resolution> {
        // Atomic check-and-remove; a separate contains/remove pair would race
        let request = self.pending.lock().remove(confirmation_id)?;

        let confidence = if request.options.iter().any(|o| o == selected_option) {
            1.0 / request.options.len() as f32
        } else {
            0.5
        };

        Some(Resolution {
            selected_option: selected_option.to_string(),
            confidence,
        })
    }

    /// Render the clarification prompt in the farmer's language, with a
    /// language-neutral English default
    pub fn message(&self, _query: &str, options: &[String], language: Language) -> String {
        let joined = options.join(", ");
        match language {
            Language::Hindi => format!(
                "आपका प्रश्न अस्पष्ट है। क्या आपका मतलब है: {joined}?"
            ),
            Language::Tamil => format!(
                "உங்கள் கேள்வி தெளிவற்றது. நீங்கள் குறிப்பிட்டது: {joined}?"
            ),
            Language::Telugu => format!(
                "మీ ప్రశ్న అస్పష్టం. మీరు అర్థం చేసుకున్నది: {joined}?"
            ),
            _ => format!("Your query is ambiguous. Did you mean: {joined}?"),
        }
    }

    /// Number of clarifications still pending
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec![
            "paddy".to_string(),
            "basmati".to_string(),
            "parboiled rice".to_string(),
        ]
    }

    #[test]
    fn create_then_resolve() {
        let handler = DisambiguationHandler::new();
        let id = handler.create("rice price", options(), Language::Hindi);
        assert_eq!(handler.pending_count(), 1);

        let resolution = handler.resolve(&id, "basmati").unwrap();
        assert_eq!(resolution.selected_option, "basmati");
        assert!((resolution.confidence - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(handler.pending_count(), 0);
    }

    #[test]
    fn resolution_is_single_use() {
        let handler = DisambiguationHandler::new();
        let id = handler.create("rice price", options(), Language::Hindi);

        assert!(handler.resolve(&id, "paddy").is_some());
        assert!(handler.resolve(&id, "paddy").is_none());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let handler = DisambiguationHandler::new();
        assert!(handler.resolve("no-such-id", "paddy").is_none());
    }

    #[test]
    fn off_list_selection_scores_half() {
        let handler = DisambiguationHandler::new();
        let id = handler.create("rice price", options(), Language::Hindi);
        let resolution = handler.resolve(&id, "jowar").unwrap();
        assert_eq!(resolution.confidence, 0.5);
    }

    #[test]
    fn ids_are_unique() {
        let handler = DisambiguationHandler::new();
        let a = handler.create("q", options(), Language::Hindi);
        let b = handler.create("q", options(), Language::Hindi);
        assert_ne!(a, b);
        assert_eq!(handler.pending_count(), 2);
    }

    #[test]
    fn localized_messages() {
        let handler = DisambiguationHandler::new();
        let opts = options();

        let hindi = handler.message("q", &opts, Language::Hindi);
        assert!(hindi.contains("paddy, basmati, parboiled rice"));

        let english = handler.message("q", &opts, Language::English);
        assert!(english.starts_with("Your query is ambiguous"));

        // No Bengali template; falls back to the neutral default
        let bengali = handler.message("q", &opts, Language::Bengali);
        assert_eq!(bengali, english);
    }
}
