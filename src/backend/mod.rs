//! Graph backends
//!
//! A backend executes single, self-contained graph statements. Each call is
//! atomic on its own; nothing spans calls. Reconciliation (validation,
//! deduplication, projection) lives in [`crate::knowledge_base`].

mod memory;
mod neo4j;

pub use memory::MemoryBackend;
pub use neo4j::{Neo4jBackend, Neo4jConfig};

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Entity, Relation};

/// Name of the full-text index over `(name, type, observations)`
pub const FULLTEXT_INDEX: &str = "search";

/// Label carried by every entity node
pub const ENTITY_LABEL: &str = "Memory";

/// Which entities seed a graph read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphFilter {
    /// Every entity
    All,
    /// Entities matching a full-text query
    FullText(String),
    /// Entities whose name is exactly one of these
    Names(Vec<String>),
}

/// Entity columns as returned by the store; any column may be null
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRecord {
    pub name: Option<String>,
    pub entity_type: Option<String>,
    pub observations: Option<Vec<String>>,
    /// Relevance of a matched entity; `None` for neighbours reached by expansion
    pub score: Option<f64>,
}

impl EntityRecord {
    pub fn matched(entity: &Entity, score: f64) -> Self {
        Self {
            name: Some(entity.name.clone()),
            entity_type: Some(entity.entity_type.clone()),
            observations: Some(entity.observations.clone()),
            score: Some(score),
        }
    }

    pub fn neighbour(entity: &Entity) -> Self {
        Self {
            score: None,
            ..Self::matched(entity, 0.0)
        }
    }
}

/// Relation columns as returned by the store; any column may be null
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationRecord {
    pub source: Option<String>,
    pub target: Option<String>,
    pub relation_type: Option<String>,
}

impl From<&Relation> for RelationRecord {
    fn from(relation: &Relation) -> Self {
        Self {
            source: Some(relation.source.clone()),
            target: Some(relation.target.clone()),
            relation_type: Some(relation.relation_type.clone()),
        }
    }
}

/// Unprocessed result of a graph read: matched entities, their one-hop
/// neighbours and incident relations, possibly with duplicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGraph {
    pub entities: Vec<EntityRecord>,
    pub relations: Vec<RelationRecord>,
}

/// Statement-level access to a property graph store
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Create the full-text index if it does not exist yet
    async fn ensure_fulltext_index(&self) -> StoreResult<()>;

    /// Create-or-match the entity by name and overwrite its type and observations
    async fn merge_entity(&self, entity: &Entity) -> StoreResult<()>;

    /// Create-or-match the edge; returns `false` when an endpoint is missing
    /// and nothing was created
    async fn merge_relation(&self, relation: &Relation) -> StoreResult<bool>;

    /// Append the contents not already present. `None` when the entity does not exist.
    async fn add_observations(
        &self,
        entity_name: &str,
        contents: &[String],
    ) -> StoreResult<Option<Vec<String>>>;

    /// Remove the entity and every incident relation
    async fn delete_entity(&self, name: &str) -> StoreResult<()>;

    /// Remove the listed observations from the entity
    async fn delete_observations(&self, entity_name: &str, observations: &[String])
        -> StoreResult<()>;

    /// Remove the edge matching the exact triple
    async fn delete_relation(&self, relation: &Relation) -> StoreResult<()>;

    /// Read seed entities plus one-hop expansion
    async fn load_graph(&self, filter: &GraphFilter) -> StoreResult<RawGraph>;

    /// Release connections held by the backend
    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}
