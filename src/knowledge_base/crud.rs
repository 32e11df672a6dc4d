//! Mutating operations for the knowledge base
//!
//! Each batch is validated as a whole first. Items are then applied one
//! statement at a time, so a failure part-way leaves earlier items applied.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::StoreResult;
use crate::types::{
    AddedObservations, Entity, ObservationAddition, ObservationDeletion, Relation,
};
use crate::validation::{
    validate_additions, validate_deletions, validate_entities, validate_names, validate_relations,
};

use super::KnowledgeBase;

/// Drop repeated strings, keeping the first occurrence of each
pub(crate) fn dedup_preserving_order(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}

/// Merge entities by name, overwriting type and observations
pub async fn create_entities(kb: &KnowledgeBase, entities: Vec<Entity>) -> StoreResult<Vec<Entity>> {
    validate_entities(&entities)?;
    info!(count = entities.len(), "Creating entities");

    for entity in &entities {
        let stored = Entity {
            observations: dedup_preserving_order(&entity.observations),
            ..entity.clone()
        };
        kb.backend.merge_entity(&stored).await?;
    }
    Ok(entities)
}

/// Merge relations; those with a missing endpoint create nothing
pub async fn create_relations(
    kb: &KnowledgeBase,
    relations: Vec<Relation>,
) -> StoreResult<Vec<Relation>> {
    validate_relations(&relations)?;
    info!(count = relations.len(), "Creating relations");

    for relation in &relations {
        if !kb.backend.merge_relation(relation).await? {
            debug!(
                source = %relation.source,
                target = %relation.target,
                relation_type = %relation.relation_type,
                "Skipped relation with missing endpoint"
            );
        }
    }
    Ok(relations)
}

/// Set-union observations into entities, reporting what was actually new
pub async fn add_observations(
    kb: &KnowledgeBase,
    additions: Vec<ObservationAddition>,
) -> StoreResult<Vec<AddedObservations>> {
    validate_additions(&additions)?;
    info!(count = additions.len(), "Adding observations");

    let mut results = Vec::with_capacity(additions.len());
    for addition in additions {
        let contents = dedup_preserving_order(&addition.contents);
        let added = kb
            .backend
            .add_observations(&addition.entity_name, &contents)
            .await?
            .unwrap_or_else(|| {
                debug!(entity = %addition.entity_name, "No such entity, nothing added");
                Vec::new()
            });
        results.push(AddedObservations {
            entity_name: addition.entity_name,
            added_observations: added,
        });
    }
    Ok(results)
}

/// Delete entities together with every relation touching them
pub async fn delete_entities(kb: &KnowledgeBase, entity_names: Vec<String>) -> StoreResult<()> {
    validate_names(&entity_names)?;
    info!(count = entity_names.len(), "Deleting entities");

    for name in dedup_preserving_order(&entity_names) {
        kb.backend.delete_entity(&name).await?;
    }
    Ok(())
}

/// Remove specific observations from entities
pub async fn delete_observations(
    kb: &KnowledgeBase,
    deletions: Vec<ObservationDeletion>,
) -> StoreResult<()> {
    validate_deletions(&deletions)?;
    info!(count = deletions.len(), "Deleting observations");

    for deletion in &deletions {
        kb.backend
            .delete_observations(&deletion.entity_name, &deletion.observations)
            .await?;
    }
    Ok(())
}

/// Delete relations matching the exact (source, target, type) triple
pub async fn delete_relations(kb: &KnowledgeBase, relations: Vec<Relation>) -> StoreResult<()> {
    validate_relations(&relations)?;
    info!(count = relations.len(), "Deleting relations");

    for relation in &relations {
        kb.backend.delete_relation(relation).await?;
    }
    Ok(())
}
