//! Relation types for the knowledge graph

use serde::{Deserialize, Serialize};

/// Directed, typed edge between two entities.
///
/// Identity is the full `(source, target, relationType)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relation {
    #[serde(alias = "from")]
    pub source: String,
    #[serde(alias = "to")]
    pub target: String,
    #[serde(rename = "relationType")]
    pub relation_type: String,
}

impl Relation {
    /// Create a new relation
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation_type: relation_type.into(),
        }
    }

    /// Whether either endpoint is the given entity
    pub fn touches(&self, entity_name: &str) -> bool {
        self.source == entity_name || self.target == entity_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relation_accepts_from_to_aliases() {
        let r: Relation = serde_json::from_value(
            json!({"from": "A", "to": "B", "relationType": "KNOWS"}),
        )
        .unwrap();
        assert_eq!(r, Relation::new("A", "B", "KNOWS"));

        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value, json!({"source": "A", "target": "B", "relationType": "KNOWS"}));
    }

    #[test]
    fn test_touches() {
        let r = Relation::new("A", "B", "KNOWS");
        assert!(r.touches("A"));
        assert!(r.touches("B"));
        assert!(!r.touches("C"));
    }
}
