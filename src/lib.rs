//! Neo4j Memory MCP Server
//!
//! A knowledge graph of named entities, typed relations and free-text
//! observations, persisted in Neo4j and exposed to MCP clients over stdio
//! and HTTP.
//!
//! # Modules
//!
//! - `types`: Core data structures (Entity, Relation, KnowledgeGraph)
//! - `backend`: Graph backends (Neo4j, in-memory)
//! - `knowledge_base`: Validation, deduplication and snapshot projection
//! - `search`: Full-text query parsing and matching
//! - `validation`: Argument checks shared by all operations
//! - `protocol`: MCP and JSON-RPC protocol types
//! - `tools`: The nine MCP tools
//! - `server`: JSON-RPC dispatcher and stdio transport
//! - `api`: HTTP transport and REST endpoints
//! - `config`: Command-line and environment configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use neo4j_memory::backend::MemoryBackend;
//! use neo4j_memory::tools::register_all_tools;
//! use neo4j_memory::{KnowledgeBase, McpServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let kb = KnowledgeBase::open(Arc::new(MemoryBackend::new())).await.unwrap();
//!     let mut server = McpServer::new();
//!     register_all_tools(&mut server, Arc::new(kb));
//!     server.run_stdio().await.unwrap();
//! }
//! ```

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod knowledge_base;
pub mod protocol;
pub mod search;
pub mod server;
pub mod tools;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use error::{StoreError, StoreResult};
pub use knowledge_base::KnowledgeBase;
pub use protocol::{McpTool, ServerInfo, Tool};
pub use server::McpServer;
pub use types::{
    AddedObservations, Entity, KnowledgeGraph, McpResult, ObservationAddition,
    ObservationDeletion, Relation,
};
