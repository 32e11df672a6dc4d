//! Read graph tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::{json_content, McpTool, Tool};

/// Tool for reading the entire knowledge graph
pub struct ReadGraphTool {
    kb: Arc<KnowledgeBase>,
}

impl ReadGraphTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for ReadGraphTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "read_graph",
            "Read the entire knowledge graph",
            json!({
                "type": "object",
                "properties": {}
            }),
        )
    }

    async fn execute(&self, _params: Value) -> StoreResult<Value> {
        let graph = self.kb.read_graph().await?;
        json_content(&graph)
    }
}
