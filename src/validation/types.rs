//! Shape checks for entities, relations and observation requests

use crate::error::{StoreError, StoreResult};
use crate::types::{Entity, ObservationAddition, ObservationDeletion, Relation};

/// Relation types become relationship types in the graph, so they are kept
/// to plain identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_relation_type(relation_type: &str) -> bool {
    let mut chars = relation_type.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn require_non_blank(value: &str, field: &str, index: usize) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(format!(
            "item {}: '{}' must not be empty",
            index, field
        )));
    }
    Ok(())
}

pub fn validate_entities(entities: &[Entity]) -> StoreResult<()> {
    for (i, entity) in entities.iter().enumerate() {
        require_non_blank(&entity.name, "name", i)?;
        require_non_blank(&entity.entity_type, "type", i)?;
    }
    Ok(())
}

pub fn validate_relations(relations: &[Relation]) -> StoreResult<()> {
    for (i, relation) in relations.iter().enumerate() {
        require_non_blank(&relation.source, "source", i)?;
        require_non_blank(&relation.target, "target", i)?;
        if !is_valid_relation_type(&relation.relation_type) {
            return Err(StoreError::validation(format!(
                "item {}: relationType '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                i, relation.relation_type
            )));
        }
    }
    Ok(())
}

pub fn validate_additions(additions: &[ObservationAddition]) -> StoreResult<()> {
    for (i, addition) in additions.iter().enumerate() {
        require_non_blank(&addition.entity_name, "entityName", i)?;
    }
    Ok(())
}

pub fn validate_deletions(deletions: &[ObservationDeletion]) -> StoreResult<()> {
    for (i, deletion) in deletions.iter().enumerate() {
        require_non_blank(&deletion.entity_name, "entityName", i)?;
    }
    Ok(())
}

pub fn validate_names(names: &[String]) -> StoreResult<()> {
    for (i, name) in names.iter().enumerate() {
        require_non_blank(name, "name", i)?;
    }
    Ok(())
}

pub fn validate_query(query: &str) -> StoreResult<()> {
    if query.trim().is_empty() {
        return Err(StoreError::validation("search query must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type_identifiers() {
        assert!(is_valid_relation_type("KNOWS"));
        assert!(is_valid_relation_type("works_at"));
        assert!(is_valid_relation_type("_private2"));
        assert!(!is_valid_relation_type(""));
        assert!(!is_valid_relation_type("2FAST"));
        assert!(!is_valid_relation_type("KNOWS]->(x) DETACH DELETE x //"));
        assert!(!is_valid_relation_type("has space"));
        assert!(!is_valid_relation_type("back`tick"));
    }

    #[test]
    fn test_entities_require_name_and_type() {
        assert!(validate_entities(&[Entity::new("A", "Person")]).is_ok());

        let err = validate_entities(&[Entity::new("A", "Person"), Entity::new(" ", "Person")])
            .unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
        assert!(err.to_string().contains("item 1"));

        assert!(validate_entities(&[Entity::new("A", "")]).is_err());
    }

    #[test]
    fn test_relations_check_every_item() {
        let relations = vec![
            Relation::new("A", "B", "KNOWS"),
            Relation::new("A", "B", "not valid"),
        ];
        let err = validate_relations(&relations).unwrap_err();
        assert!(err.to_string().contains("relationType"));
    }

    #[test]
    fn test_observation_requests_require_entity_name() {
        assert!(validate_additions(&[ObservationAddition::new("A", ["x"])]).is_ok());
        assert!(validate_additions(&[ObservationAddition::new("", ["x"])]).is_err());
        assert!(validate_deletions(&[ObservationDeletion::new("", ["x"])]).is_err());
    }

    #[test]
    fn test_query_and_names() {
        assert!(validate_query("alice").is_ok());
        assert!(validate_query("   ").is_err());
        assert!(validate_names(&["A".to_string()]).is_ok());
        assert!(validate_names(&["".to_string()]).is_err());
    }
}
