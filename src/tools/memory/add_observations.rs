//! Add observations tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::{json_content, McpTool, Tool};
use crate::tools::required_arg;
use crate::types::ObservationAddition;

/// Tool for adding new observations to existing entities
pub struct AddObservationsTool {
    kb: Arc<KnowledgeBase>,
}

impl AddObservationsTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for AddObservationsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "add_observations",
            "Add new observations to existing entities in the knowledge graph",
            json!({
                "type": "object",
                "properties": {
                    "observations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "entityName": { "type": "string", "description": "The name of the entity" },
                                "contents": {
                                    "type": "array",
                                    "items": { "type": "string" },
                                    "description": "Observation contents to add"
                                }
                            },
                            "required": ["entityName", "contents"]
                        }
                    }
                },
                "required": ["observations"]
            }),
        )
    }

    async fn execute(&self, params: Value) -> StoreResult<Value> {
        let additions: Vec<ObservationAddition> = required_arg(&params, "observations")?;
        let results = self.kb.add_observations(additions).await?;
        json_content(&json!({ "results": results }))
    }
}
