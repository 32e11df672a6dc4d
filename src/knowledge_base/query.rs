//! Read operations for the knowledge base
//!
//! All reads share one path: the backend returns matched entities with their
//! one-hop neighbourhood as raw rows, and `project` turns those rows into a
//! snapshot.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info};

use crate::backend::{GraphFilter, RawGraph};
use crate::error::StoreResult;
use crate::types::{Entity, KnowledgeGraph, Relation};
use crate::validation::{validate_names, validate_query};

use super::crud::dedup_preserving_order;
use super::KnowledgeBase;

/// Read every entity and relation
pub async fn read_graph(kb: &KnowledgeBase) -> StoreResult<KnowledgeGraph> {
    info!("Reading entire graph");
    load(kb, GraphFilter::All).await
}

/// Full-text search over name, type and observations, expanded one hop
pub async fn search_nodes(kb: &KnowledgeBase, query: &str) -> StoreResult<KnowledgeGraph> {
    validate_query(query)?;
    info!(query = %query, "Searching nodes");
    load(kb, GraphFilter::FullText(query.to_string())).await
}

/// Entities with exactly one of the given names, expanded one hop
pub async fn find_nodes(kb: &KnowledgeBase, names: Vec<String>) -> StoreResult<KnowledgeGraph> {
    validate_names(&names)?;
    let names = dedup_preserving_order(&names);
    info!(count = names.len(), "Finding nodes");
    if names.is_empty() {
        return Ok(KnowledgeGraph::new());
    }
    load(kb, GraphFilter::Names(names)).await
}

async fn load(kb: &KnowledgeBase, filter: GraphFilter) -> StoreResult<KnowledgeGraph> {
    let raw = kb.backend.load_graph(&filter).await?;
    let graph = project(raw);
    debug!(
        entities = graph.entity_count(),
        relations = graph.relation_count(),
        "Loaded graph snapshot"
    );
    Ok(graph)
}

/// Turn raw rows into a snapshot.
///
/// Entities are ordered by descending score, with neighbours (no score) after
/// every matched entity, and deduplicated by name keeping the first record.
/// Relations are deduplicated by triple. Records missing their identifying
/// columns are dropped.
pub(crate) fn project(raw: RawGraph) -> KnowledgeGraph {
    let mut records = raw.entities;
    records.sort_by(|a, b| match (a.score, b.score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let mut seen_names = HashSet::new();
    let entities: Vec<Entity> = records
        .into_iter()
        .filter_map(|record| {
            let name = record.name?;
            if !seen_names.insert(name.clone()) {
                return None;
            }
            Some(Entity {
                name,
                entity_type: record.entity_type.unwrap_or_default(),
                observations: record.observations.unwrap_or_default(),
            })
        })
        .collect();

    let mut seen_relations = HashSet::new();
    let relations: Vec<Relation> = raw
        .relations
        .into_iter()
        .filter_map(|record| {
            let relation = Relation {
                source: record.source?,
                target: record.target?,
                relation_type: record.relation_type?,
            };
            seen_relations.insert(relation.clone()).then_some(relation)
        })
        .collect();

    KnowledgeGraph { entities, relations }
}
