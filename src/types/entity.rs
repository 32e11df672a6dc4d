//! Entity types for the knowledge graph

use serde::{Deserialize, Serialize};

/// Entity in the knowledge graph, identified by its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type", alias = "entityType")]
    pub entity_type: String,
    #[serde(default)]
    pub observations: Vec<String>,
}

impl Entity {
    /// Create a new entity without observations
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            observations: Vec::new(),
        }
    }

    /// Create a new entity with observations
    pub fn with_observations<I, S>(
        name: impl Into<String>,
        entity_type: impl Into<String>,
        observations: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            observations: observations.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_accepts_both_type_spellings() {
        let a: Entity = serde_json::from_value(json!({"name": "A", "type": "Person"})).unwrap();
        let b: Entity =
            serde_json::from_value(json!({"name": "A", "entityType": "Person"})).unwrap();
        assert_eq!(a, b);
        assert!(a.observations.is_empty());
    }

    #[test]
    fn test_entity_serializes_type_field() {
        let entity = Entity::with_observations("A", "Person", ["likes cats"]);
        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(value["type"], "Person");
        assert_eq!(value["observations"][0], "likes cats");
        assert!(value.get("entityType").is_none());
    }
}
