//! Intent recognition, entity extraction, and ambiguity detection
//!
//! Pattern tables are declared as ordered lists, not maps: when two intents
//! score the same, the earlier-declared one wins, and that tie-break order is
//! part of the component's contract.

use once_cell::sync::Lazy;
use regex::Regex;

use krishi_voice_core::{EntitySet, Quantity};

/// Recognized intent with its confidence
#[derive(Debug, Clone, PartialEq)]
pub struct IntentResult {
    pub label: String,
    pub confidence: f32,
}

/// Intent label returned when no pattern matches
pub const GENERAL_QUERY: &str = "general_query";

/// Ordered intent pattern table; earlier entries win ties
static INTENT_TABLE: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    let table: [(&str, &[&str]); 6] = [
        (
            "weather_query",
            &["weather", "forecast", "rain", "temperature", "monsoon"],
        ),
        (
            "price_query",
            &["price", "mandi", "rate", "cost", "market"],
        ),
        (
            "scheme_query",
            &["scheme", "subsidy", "government", "loan", "insurance"],
        ),
        (
            "crop_query",
            &["crop", "cultivation", "plant", "grow", "sow"],
        ),
        (
            "disease_query",
            &["disease", "pest", "infection", "treatment", "cure"],
        ),
        (
            "fertilizer_query",
            &["fertilizer", "nutrient", "urea", "dap", "manure"],
        ),
    ];

    table
        .iter()
        .map(|(label, keywords)| (*label, compile_keywords(keywords)))
        .collect()
});

/// Known crop names for entity extraction
const CROP_NAMES: &[&str] = &[
    "wheat", "rice", "paddy", "cotton", "sugarcane", "corn", "maize", "soybean", "groundnut",
    "mustard", "potato", "tomato", "onion",
];

/// Known Indian state names
const STATE_NAMES: &[&str] = &[
    "maharashtra",
    "punjab",
    "haryana",
    "uttar pradesh",
    "karnataka",
    "andhra pradesh",
    "telangana",
    "tamil nadu",
    "west bengal",
    "gujarat",
];

/// Time keywords tested in priority order; first match wins
const TIME_KEYWORDS: &[(&str, &str)] = &[
    ("today", "today"),
    ("tomorrow", "tomorrow"),
    ("this week", "this_week"),
    ("next month", "next_month"),
    ("kharif", "kharif"),
    ("rabi", "rabi"),
];

/// Crop terms that need a variant to be unambiguous
const AMBIGUOUS_CROPS: &[(&str, &[&str])] = &[
    ("rice", &["paddy", "basmati", "parboiled rice"]),
    ("millet", &["bajra", "jowar", "ragi"]),
    ("oilseed", &["mustard", "sunflower", "groundnut"]),
];

/// Crops whose mention makes a price query specific
const PRICE_CROPS: &[&str] = &["wheat", "rice", "cotton", "sugarcane"];

/// Options offered for an unspecific price query
const PRICE_OPTIONS: &[&str] = &["wheat", "rice", "cotton", "sugarcane", "soybean"];

static CROP_PATTERNS: Lazy<Vec<(usize, Regex)>> = Lazy::new(|| {
    CROP_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (i, word_pattern(name)))
        .collect()
});

static STATE_PATTERNS: Lazy<Vec<(usize, Regex)>> = Lazy::new(|| {
    STATE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (i, word_pattern(name)))
        .collect()
});

static QUANTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d+)\s*(kg|quintal|ton|acre|hectare|liter|ml)\b")
        .expect("static quantity pattern")
});

static AMBIGUOUS_CROP_PATTERNS: Lazy<Vec<(usize, Regex, Vec<Regex>)>> = Lazy::new(|| {
    AMBIGUOUS_CROPS
        .iter()
        .enumerate()
        .map(|(i, (crop, variants))| {
            (
                i,
                word_pattern(crop),
                variants.iter().map(|v| word_pattern(v)).collect(),
            )
        })
        .collect()
});

static PRICE_QUERY_PATTERN: Lazy<Regex> = Lazy::new(|| word_pattern("price|rate"));

static PRICE_CROP_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| PRICE_CROPS.iter().map(|c| word_pattern(c)).collect());

/// Word-bounded pattern for a keyword or alternation of keywords.
/// A bare substring check would let "price" name "rice".
fn word_pattern(keyword: &str) -> Regex {
    Regex::new(&format!(r"\b(?:{keyword})\b")).expect("static keyword pattern")
}

fn compile_keywords(keywords: &[&str]) -> Vec<Regex> {
    keywords.iter().map(|k| word_pattern(k)).collect()
}

/// Rule-based recognizer for agricultural queries
#[derive(Debug, Clone, Default)]
pub struct IntentRecognizer;

impl IntentRecognizer {
    pub fn new() -> Self {
        Self
    }

    /// Recognize the query intent.
    ///
    /// Each pattern's match count yields `min(0.5 + 0.1 * count, 0.95)`; the
    /// highest score wins and ties keep the earlier table entry. No match at
    /// all yields `(general_query, 0.0)`.
    pub fn recognize_intent(&self, text: &str) -> IntentResult {
        let lower = text.to_lowercase();
        let mut best_label = GENERAL_QUERY;
        let mut best_confidence = 0.0_f32;

        for (label, patterns) in INTENT_TABLE.iter() {
            for pattern in patterns {
                let matches = pattern.find_iter(&lower).count();
                if matches == 0 {
                    continue;
                }
                let confidence = (0.5 + 0.1 * matches as f32).min(0.95);
                if confidence > best_confidence {
                    best_label = label;
                    best_confidence = confidence;
                }
            }
        }

        IntentResult {
            label: best_label.to_string(),
            confidence: best_confidence,
        }
    }

    /// Extract entities with independent deterministic scans
    pub fn extract_entities(&self, text: &str) -> EntitySet {
        let lower = text.to_lowercase();
        let mut entities = EntitySet::default();

        // Crops: all matches, in declaration order
        for (i, pattern) in CROP_PATTERNS.iter() {
            if pattern.is_match(&lower) {
                entities.crops.push(CROP_NAMES[*i].to_string());
            }
        }

        // State: first match only
        for (i, pattern) in STATE_PATTERNS.iter() {
            if pattern.is_match(&lower) {
                entities.state = Some(STATE_NAMES[*i].to_string());
                break;
            }
        }

        // Quantities: <integer><unit> for the fixed unit set
        for capture in QUANTITY_PATTERN.captures_iter(&lower) {
            if let Ok(value) = capture[1].parse::<u32>() {
                entities.quantities.push(Quantity {
                    value,
                    unit: capture[2].to_string(),
                });
            }
        }

        // Time: first keyword in priority order
        for (keyword, time_expr) in TIME_KEYWORDS {
            if lower.contains(keyword) {
                entities.time = Some(time_expr.to_string());
                break;
            }
        }

        entities
    }

    /// Check whether a query needs disambiguation.
    ///
    /// Rules are evaluated in order; the first applicable one decides:
    /// 1. an ambiguous crop term without any of its variants,
    /// 2. a price query naming none of the fixed crop set,
    /// 3. low recognition confidence (empty options).
    pub fn is_ambiguous(&self, text: &str, confidence: f32) -> (bool, Vec<String>) {
        let lower = text.to_lowercase();

        for (i, crop_pattern, variant_patterns) in AMBIGUOUS_CROP_PATTERNS.iter() {
            if crop_pattern.is_match(&lower)
                && !variant_patterns.iter().any(|v| v.is_match(&lower))
            {
                let (_, variants) = AMBIGUOUS_CROPS[*i];
                return (true, variants.iter().map(|v| v.to_string()).collect());
            }
        }

        if PRICE_QUERY_PATTERN.is_match(&lower)
            && !PRICE_CROP_PATTERNS.iter().any(|c| c.is_match(&lower))
        {
            return (
                true,
                PRICE_OPTIONS.iter().map(|c| c.to_string()).collect(),
            );
        }

        if confidence < 0.6 {
            return (true, Vec::new());
        }

        (false, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_weather_query() {
        let recognizer = IntentRecognizer::new();
        let result = recognizer.recognize_intent("What is the weather forecast for tomorrow?");
        assert_eq!(result.label, "weather_query");
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn recognizes_price_query() {
        let recognizer = IntentRecognizer::new();
        let result = recognizer.recognize_intent("Tell me the mandi price of wheat");
        assert_eq!(result.label, "price_query");
    }

    #[test]
    fn falls_back_to_general_query() {
        let recognizer = IntentRecognizer::new();
        let result = recognizer.recognize_intent("Hello, how are you doing?");
        assert_eq!(result.label, GENERAL_QUERY);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn confidence_grows_with_match_count_and_caps() {
        let recognizer = IntentRecognizer::new();
        let once = recognizer.recognize_intent("weather");
        let thrice = recognizer.recognize_intent("weather weather weather");
        assert!(thrice.confidence > once.confidence);

        let many = recognizer.recognize_intent(&"weather ".repeat(20));
        assert_eq!(many.confidence, 0.95);
    }

    #[test]
    fn confidence_always_in_unit_interval() {
        let recognizer = IntentRecognizer::new();
        for text in [
            "",
            "rain rain rain rain rain rain rain rain",
            "price scheme crop disease fertilizer",
            "completely unrelated sentence",
        ] {
            let result = recognizer.recognize_intent(text);
            assert!((0.0..=1.0).contains(&result.confidence), "{text}");
            assert!(!result.label.is_empty());
        }
    }

    #[test]
    fn ties_keep_earlier_table_entry() {
        let recognizer = IntentRecognizer::new();
        // One weather keyword and one scheme keyword score identically;
        // weather_query is declared first
        let result = recognizer.recognize_intent("monsoon insurance");
        assert_eq!(result.label, "weather_query");
    }

    #[test]
    fn extracts_all_crops() {
        let recognizer = IntentRecognizer::new();
        let entities = recognizer.extract_entities("Compare wheat and cotton yields");
        assert_eq!(entities.crops, vec!["wheat", "cotton"]);
    }

    #[test]
    fn price_does_not_count_as_rice() {
        let recognizer = IntentRecognizer::new();
        let entities = recognizer.extract_entities("what is the wheat price");
        assert_eq!(entities.crops, vec!["wheat"]);
    }

    #[test]
    fn extracts_first_state_only() {
        let recognizer = IntentRecognizer::new();
        let entities = recognizer.extract_entities("prices in punjab and haryana");
        assert_eq!(entities.state.as_deref(), Some("punjab"));
    }

    #[test]
    fn extracts_quantities() {
        let recognizer = IntentRecognizer::new();
        let entities = recognizer.extract_entities("I harvested 50 quintal from 2 acre");
        assert_eq!(
            entities.quantities,
            vec![
                Quantity {
                    value: 50,
                    unit: "quintal".to_string()
                },
                Quantity {
                    value: 2,
                    unit: "acre".to_string()
                },
            ]
        );
    }

    #[test]
    fn time_priority_order() {
        let recognizer = IntentRecognizer::new();
        // "today" outranks "kharif" despite appearing later in the text
        let entities = recognizer.extract_entities("kharif sowing today");
        assert_eq!(entities.time.as_deref(), Some("today"));
    }

    #[test]
    fn no_entities_yields_empty_set() {
        let recognizer = IntentRecognizer::new();
        let entities = recognizer.extract_entities("hello there");
        assert!(entities.is_empty());
    }

    #[test]
    fn ambiguous_crop_without_variant() {
        let recognizer = IntentRecognizer::new();
        let (ambiguous, options) = recognizer.is_ambiguous("What is the rice price", 0.9);
        assert!(ambiguous);
        assert_eq!(options, vec!["paddy", "basmati", "parboiled rice"]);
    }

    #[test]
    fn crop_with_variant_is_specific() {
        let recognizer = IntentRecognizer::new();
        let (ambiguous, _) = recognizer.is_ambiguous("basmati rice cultivation tips", 0.9);
        assert!(!ambiguous);
    }

    #[test]
    fn price_query_without_crop() {
        let recognizer = IntentRecognizer::new();
        let (ambiguous, options) = recognizer.is_ambiguous("what is the market rate", 0.9);
        assert!(ambiguous);
        assert_eq!(
            options,
            vec!["wheat", "rice", "cotton", "sugarcane", "soybean"]
        );
    }

    #[test]
    fn price_query_with_crop_is_specific() {
        let recognizer = IntentRecognizer::new();
        let (ambiguous, _) = recognizer.is_ambiguous("wheat price in punjab", 0.9);
        assert!(!ambiguous);
    }

    #[test]
    fn low_confidence_is_ambiguous_with_empty_options() {
        let recognizer = IntentRecognizer::new();
        let (ambiguous, options) = recognizer.is_ambiguous("sow wheat in punjab", 0.3);
        assert!(ambiguous);
        assert!(options.is_empty());
    }

    #[test]
    fn ambiguity_is_pure() {
        let recognizer = IntentRecognizer::new();
        let first = recognizer.is_ambiguous("millet farming", 0.8);
        for _ in 0..5 {
            assert_eq!(recognizer.is_ambiguous("millet farming", 0.8), first);
        }
    }
}
