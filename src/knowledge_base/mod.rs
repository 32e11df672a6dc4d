//! Knowledge Base - reconciliation layer over a graph backend
//!
//! Validates calls, keeps observation sets duplicate-free, and turns raw
//! backend rows into deduplicated snapshots. A `KnowledgeBase` only exists
//! after its full-text index has been ensured, so every read can search.

mod crud;
mod query;

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::GraphBackend;
use crate::error::StoreResult;
use crate::types::{
    AddedObservations, Entity, KnowledgeGraph, ObservationAddition, ObservationDeletion, Relation,
};

/// Knowledge graph store sharing one backend handle across all callers
pub struct KnowledgeBase {
    pub(crate) backend: Arc<dyn GraphBackend>,
}

impl KnowledgeBase {
    /// Open the store: ensures the full-text index exists before returning
    pub async fn open(backend: Arc<dyn GraphBackend>) -> StoreResult<Self> {
        info!(backend = backend.name(), "Opening knowledge base");
        if let Err(e) = backend.ensure_fulltext_index().await {
            warn!(backend = backend.name(), error = %e, "Failed to prepare fulltext index");
            return Err(e);
        }
        Ok(Self { backend })
    }

    /// Close the store and release the backend's connections
    pub async fn close(self) -> StoreResult<()> {
        info!(backend = self.backend.name(), "Closing knowledge base");
        self.backend.close().await
    }

    /// Name of the backend serving this store
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

// Re-export methods from submodules by implementing them here
impl KnowledgeBase {
    // CRUD operations (from crud.rs)
    pub async fn create_entities(&self, entities: Vec<Entity>) -> StoreResult<Vec<Entity>> {
        crud::create_entities(self, entities).await
    }

    pub async fn create_relations(&self, relations: Vec<Relation>) -> StoreResult<Vec<Relation>> {
        crud::create_relations(self, relations).await
    }

    pub async fn add_observations(
        &self,
        additions: Vec<ObservationAddition>,
    ) -> StoreResult<Vec<AddedObservations>> {
        crud::add_observations(self, additions).await
    }

    pub async fn delete_entities(&self, entity_names: Vec<String>) -> StoreResult<()> {
        crud::delete_entities(self, entity_names).await
    }

    pub async fn delete_observations(&self, deletions: Vec<ObservationDeletion>) -> StoreResult<()> {
        crud::delete_observations(self, deletions).await
    }

    pub async fn delete_relations(&self, relations: Vec<Relation>) -> StoreResult<()> {
        crud::delete_relations(self, relations).await
    }

    // Read operations (from query.rs)
    pub async fn read_graph(&self) -> StoreResult<KnowledgeGraph> {
        query::read_graph(self).await
    }

    pub async fn search_nodes(&self, query: &str) -> StoreResult<KnowledgeGraph> {
        query::search_nodes(self, query).await
    }

    pub async fn find_nodes(&self, names: Vec<String>) -> StoreResult<KnowledgeGraph> {
        query::find_nodes(self, names).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    #[tokio::test]
    async fn test_open_creates_index() {
        let backend = Arc::new(MemoryBackend::new());
        assert!(!backend.has_fulltext_index());

        let kb = KnowledgeBase::open(backend.clone()).await.unwrap();
        assert!(backend.has_fulltext_index());
        assert_eq!(kb.backend_name(), "memory");

        // reopening against an existing index is fine
        let again = KnowledgeBase::open(backend.clone()).await.unwrap();
        again.close().await.unwrap();
        kb.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_fails_when_store_unreachable() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_online(false);
        let err = KnowledgeBase::open(backend).await.err().unwrap();
        assert_eq!(err.kind(), "StoreUnavailable");
    }
}
