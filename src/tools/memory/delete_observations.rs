//! Delete observations tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::{json_content, McpTool, Tool};
use crate::tools::{required_arg, success};
use crate::types::ObservationDeletion;

/// Tool for deleting specific observations from entities
pub struct DeleteObservationsTool {
    kb: Arc<KnowledgeBase>,
}

impl DeleteObservationsTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for DeleteObservationsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "delete_observations",
            "Delete specific observations from entities in the knowledge graph",
            json!({
                "type": "object",
                "properties": {
                    "deletions": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "entityName": { "type": "string", "description": "The name of the entity" },
                                "observations": {
                                    "type": "array",
                                    "items": { "type": "string" },
                                    "description": "Observations to delete"
                                }
                            },
                            "required": ["entityName", "observations"]
                        }
                    }
                },
                "required": ["deletions"]
            }),
        )
    }

    async fn execute(&self, params: Value) -> StoreResult<Value> {
        let deletions: Vec<ObservationDeletion> = required_arg(&params, "deletions")?;
        self.kb.delete_observations(deletions).await?;
        json_content(&success("Observations deleted successfully"))
    }
}
