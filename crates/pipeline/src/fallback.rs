//! Degradation chain and response cache
//!
//! The handler only exposes the chain and the cache; deciding *when* to fall
//! back belongs to the orchestrator.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Interaction modes in degradation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    Voice,
    Text,
    Cached,
}

impl FallbackMode {
    /// The fixed, total degradation order
    pub const CHAIN: [FallbackMode; 3] = [FallbackMode::Voice, FallbackMode::Text, FallbackMode::Cached];

    /// Successor in the chain, `None` at the terminal
    pub fn next(self) -> Option<FallbackMode> {
        match self {
            FallbackMode::Voice => Some(FallbackMode::Text),
            FallbackMode::Text => Some(FallbackMode::Cached),
            FallbackMode::Cached => None,
        }
    }
}

/// Response cache for degraded turns, keyed by normalized query text
#[derive(Debug, Default)]
pub struct FallbackHandler {
    cache: RwLock<HashMap<String, String>>,
}

impl FallbackHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a response under the trimmed, case-folded query; last write wins
    pub fn cache_response(&self, query: &str, response: &str) {
        self.cache
            .write()
            .insert(normalize(query), response.to_string());
    }

    /// Look up a cached response under the same normalization
    pub fn get_cached_response(&self, query: &str) -> Option<String> {
        self.cache.read().get(&normalize(query)).cloned()
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_order() {
        assert_eq!(FallbackMode::Voice.next(), Some(FallbackMode::Text));
        assert_eq!(FallbackMode::Text.next(), Some(FallbackMode::Cached));
        assert_eq!(FallbackMode::Cached.next(), None);
    }

    #[test]
    fn chain_is_total() {
        assert_eq!(
            FallbackMode::CHAIN,
            [FallbackMode::Voice, FallbackMode::Text, FallbackMode::Cached]
        );
    }

    #[test]
    fn cache_is_case_insensitive() {
        let handler = FallbackHandler::new();
        handler.cache_response("Wheat Price", "check the mandi section");
        assert_eq!(
            handler.get_cached_response("WHEAT PRICE").as_deref(),
            Some("check the mandi section")
        );
    }

    #[test]
    fn cache_trims_whitespace() {
        let handler = FallbackHandler::new();
        handler.cache_response("  wheat price  ", "response");
        assert!(handler.get_cached_response("wheat price").is_some());
    }

    #[test]
    fn missing_query_returns_none() {
        let handler = FallbackHandler::new();
        assert!(handler.get_cached_response("never cached").is_none());
    }

    #[test]
    fn last_write_wins() {
        let handler = FallbackHandler::new();
        handler.cache_response("wheat price", "old");
        handler.cache_response("Wheat Price", "new");
        assert_eq!(
            handler.get_cached_response("wheat price").as_deref(),
            Some("new")
        );
    }
}
