//! Extracted entities from a farmer query

use serde::{Deserialize, Serialize};

/// Quantity expression such as "50 kg" or "2 acre"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: u32,
    pub unit: String,
}

/// Entities extracted from a query, grouped by kind
///
/// Absent kinds are omitted from serialized output entirely; there are no
/// null placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    /// Crop names, all matches in query order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crops: Vec<String>,

    /// Indian state, first match only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Quantity expressions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quantities: Vec<Quantity>,

    /// Time expression, highest-priority match only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl EntitySet {
    /// True when no entity of any kind was found
    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
            && self.state.is_none()
            && self.quantities.is_empty()
            && self.time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_serializes_to_empty_object() {
        let entities = EntitySet::default();
        assert!(entities.is_empty());
        assert_eq!(serde_json::to_string(&entities).unwrap(), "{}");
    }

    #[test]
    fn absent_kinds_are_omitted() {
        let entities = EntitySet {
            crops: vec!["wheat".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&entities).unwrap();
        assert!(json.get("crops").is_some());
        assert!(json.get("state").is_none());
        assert!(json.get("quantities").is_none());
        assert!(json.get("time").is_none());
    }
}
