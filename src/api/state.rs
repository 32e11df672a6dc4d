//! Shared application state for HTTP handlers

use std::sync::Arc;

use crate::knowledge_base::KnowledgeBase;
use crate::server::McpServer;

/// State shared by every HTTP handler
pub struct AppState {
    /// The knowledge base
    pub kb: Arc<KnowledgeBase>,

    /// JSON-RPC dispatcher behind `POST /mcp`
    pub mcp: Arc<McpServer>,
}

impl AppState {
    pub fn new(kb: Arc<KnowledgeBase>, mcp: Arc<McpServer>) -> Self {
        Self { kb, mcp }
    }
}
