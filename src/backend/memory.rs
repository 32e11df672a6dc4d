//! In-process graph backend
//!
//! Mirrors the statement semantics of the Neo4j backend against a graph held
//! in memory. Used by the test suite and for local runs without a database.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::debug;

use super::{EntityRecord, GraphBackend, GraphFilter, RawGraph, RelationRecord, FULLTEXT_INDEX};
use crate::error::{StoreError, StoreResult};
use crate::search::{names_query, FullTextQuery};
use crate::types::{Entity, Relation};

/// Threshold for using parallel matching (entities count)
const PARALLEL_SEARCH_THRESHOLD: usize = 1000;

#[derive(Debug, Default)]
struct MemoryGraph {
    entities: BTreeMap<String, Entity>,
    relations: BTreeSet<Relation>,
    fulltext_index: bool,
}

/// Graph backend that keeps everything in process memory
#[derive(Debug)]
pub struct MemoryBackend {
    graph: RwLock<MemoryGraph>,
    online: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(MemoryGraph::default()),
            online: AtomicBool::new(true),
        }
    }

    /// Simulate losing (or regaining) the connection to the store
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn has_fulltext_index(&self) -> bool {
        self.graph.read().fulltext_index
    }

    pub fn entity_count(&self) -> usize {
        self.graph.read().entities.len()
    }

    pub fn relation_count(&self) -> usize {
        self.graph.read().relations.len()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable("connection to the memory backend is closed"))
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ensure_fulltext_index(&self) -> StoreResult<()> {
        self.check_online()?;
        let mut graph = self.graph.write();
        if graph.fulltext_index {
            debug!(index = FULLTEXT_INDEX, "Fulltext index already exists");
        }
        graph.fulltext_index = true;
        Ok(())
    }

    async fn merge_entity(&self, entity: &Entity) -> StoreResult<()> {
        self.check_online()?;
        self.graph
            .write()
            .entities
            .insert(entity.name.clone(), entity.clone());
        Ok(())
    }

    async fn merge_relation(&self, relation: &Relation) -> StoreResult<bool> {
        self.check_online()?;
        let mut graph = self.graph.write();
        if !graph.entities.contains_key(&relation.source)
            || !graph.entities.contains_key(&relation.target)
        {
            return Ok(false);
        }
        graph.relations.insert(relation.clone());
        Ok(true)
    }

    async fn add_observations(
        &self,
        entity_name: &str,
        contents: &[String],
    ) -> StoreResult<Option<Vec<String>>> {
        self.check_online()?;
        let mut graph = self.graph.write();
        let Some(entity) = graph.entities.get_mut(entity_name) else {
            return Ok(None);
        };

        let new: Vec<String> = contents
            .iter()
            .filter(|c| !entity.observations.contains(c))
            .cloned()
            .collect();
        entity.observations.extend(new.iter().cloned());
        Ok(Some(new))
    }

    async fn delete_entity(&self, name: &str) -> StoreResult<()> {
        self.check_online()?;
        let mut graph = self.graph.write();
        if graph.entities.remove(name).is_some() {
            graph.relations.retain(|r| !r.touches(name));
        }
        Ok(())
    }

    async fn delete_observations(
        &self,
        entity_name: &str,
        observations: &[String],
    ) -> StoreResult<()> {
        self.check_online()?;
        if let Some(entity) = self.graph.write().entities.get_mut(entity_name) {
            entity.observations.retain(|o| !observations.contains(o));
        }
        Ok(())
    }

    async fn delete_relation(&self, relation: &Relation) -> StoreResult<()> {
        self.check_online()?;
        self.graph.write().relations.remove(relation);
        Ok(())
    }

    async fn load_graph(&self, filter: &GraphFilter) -> StoreResult<RawGraph> {
        self.check_online()?;
        let graph = self.graph.read();

        let seeds: Vec<(&Entity, f64)> = match filter {
            GraphFilter::All => graph.entities.values().map(|e| (e, 1.0)).collect(),
            GraphFilter::FullText(text) => fulltext_seeds(&graph, text)?,
            GraphFilter::Names(names) => {
                let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
                let mut seeds = fulltext_seeds(&graph, &names_query(names))?;
                seeds.retain(|(e, _)| wanted.contains(e.name.as_str()));
                seeds
            }
        };

        // One row per (seed, incident relation), or a row with null relation
        // columns when the seed has none, as an OPTIONAL MATCH would produce.
        let mut raw = RawGraph::default();
        for (seed, score) in seeds {
            let mut incident = graph.relations.iter().filter(|r| r.touches(&seed.name)).peekable();
            if incident.peek().is_none() {
                raw.entities.push(EntityRecord::matched(seed, score));
                raw.relations.push(RelationRecord::default());
                continue;
            }
            for relation in incident {
                raw.entities.push(EntityRecord::matched(seed, score));
                let other = if relation.source == seed.name {
                    &relation.target
                } else {
                    &relation.source
                };
                if let Some(neighbour) = graph.entities.get(other) {
                    raw.entities.push(EntityRecord::neighbour(neighbour));
                }
                raw.relations.push(RelationRecord::from(relation));
            }
        }

        debug!(
            entities = raw.entities.len(),
            relations = raw.relations.len(),
            "Loaded raw graph rows"
        );
        Ok(raw)
    }
}

/// Entities matching a full-text query, with their scores
fn fulltext_seeds<'g>(graph: &'g MemoryGraph, text: &str) -> StoreResult<Vec<(&'g Entity, f64)>> {
    if !graph.fulltext_index {
        return Err(StoreError::backend(format!(
            "there is no such fulltext schema index: {}",
            FULLTEXT_INDEX
        )));
    }
    let query = FullTextQuery::parse(text)
        .map_err(|e| StoreError::backend(format!("failed to parse fulltext query: {}", e)))?;

    let seeds = if graph.entities.len() > PARALLEL_SEARCH_THRESHOLD {
        graph
            .entities
            .par_iter()
            .filter_map(|(_, e)| query.score(e).map(|s| (e, s)))
            .collect()
    } else {
        graph
            .entities
            .values()
            .filter_map(|e| query.score(e).map(|s| (e, s)))
            .collect()
    };
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_merge_relation_requires_both_endpoints() {
        let backend = MemoryBackend::new();
        backend.merge_entity(&Entity::new("A", "Person")).await.unwrap();

        let linked = backend
            .merge_relation(&Relation::new("A", "B", "KNOWS"))
            .await
            .unwrap();
        assert!(!linked);
        assert_eq!(backend.relation_count(), 0);

        backend.merge_entity(&Entity::new("B", "Person")).await.unwrap();
        assert!(backend
            .merge_relation(&Relation::new("A", "B", "KNOWS"))
            .await
            .unwrap());
        assert!(backend
            .merge_relation(&Relation::new("A", "B", "KNOWS"))
            .await
            .unwrap());
        assert_eq!(backend.relation_count(), 1);
    }

    #[tokio::test]
    async fn test_fulltext_read_needs_index() {
        let backend = MemoryBackend::new();
        backend.merge_entity(&Entity::new("A", "Person")).await.unwrap();

        let err = backend
            .load_graph(&GraphFilter::FullText("a".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "BackendError");

        backend.ensure_fulltext_index().await.unwrap();
        backend.ensure_fulltext_index().await.unwrap();
        assert!(backend.has_fulltext_index());

        let raw = backend
            .load_graph(&GraphFilter::FullText("a".to_string()))
            .await
            .unwrap();
        assert_eq!(raw.entities.len(), 1);
        // seed without relations yields a null relation row
        assert_eq!(raw.relations, vec![RelationRecord::default()]);
    }

    #[tokio::test]
    async fn test_load_graph_rows_include_neighbours() {
        let backend = MemoryBackend::new();
        backend.ensure_fulltext_index().await.unwrap();
        backend.merge_entity(&Entity::new("A", "Person")).await.unwrap();
        backend.merge_entity(&Entity::new("B", "Robot")).await.unwrap();
        backend
            .merge_relation(&Relation::new("A", "B", "KNOWS"))
            .await
            .unwrap();

        let raw = backend
            .load_graph(&GraphFilter::FullText("person".to_string()))
            .await
            .unwrap();
        let names: Vec<_> = raw.entities.iter().filter_map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(raw.entities[1].score, None);
        assert_eq!(raw.relations.len(), 1);
    }

    #[tokio::test]
    async fn test_offline_backend_is_unavailable() {
        let backend = MemoryBackend::new();
        backend.set_online(false);
        let err = backend
            .merge_entity(&Entity::new("A", "Person"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "StoreUnavailable");

        backend.set_online(true);
        assert!(backend.merge_entity(&Entity::new("A", "Person")).await.is_ok());
    }

    #[tokio::test]
    async fn test_names_filter_is_exact() {
        let backend = MemoryBackend::new();
        backend.ensure_fulltext_index().await.unwrap();
        backend.merge_entity(&Entity::new("Alice", "Person")).await.unwrap();
        backend
            .merge_entity(&Entity::new("Alice Cooper", "Musician"))
            .await
            .unwrap();

        let raw = backend
            .load_graph(&GraphFilter::Names(vec!["Alice".to_string()]))
            .await
            .unwrap();
        let names: Vec<_> = raw.entities.iter().filter_map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["Alice"]);
    }
}
