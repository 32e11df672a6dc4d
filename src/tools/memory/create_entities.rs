//! Create entities tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::{json_content, McpTool, Tool};
use crate::tools::required_arg;
use crate::types::Entity;

/// Tool for creating (or updating) multiple entities in the knowledge graph
pub struct CreateEntitiesTool {
    kb: Arc<KnowledgeBase>,
}

impl CreateEntitiesTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for CreateEntitiesTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "create_entities",
            "Create multiple new entities in the knowledge graph",
            json!({
                "type": "object",
                "properties": {
                    "entities": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string", "description": "The name of the entity" },
                                "type": { "type": "string", "description": "The type of the entity" },
                                "observations": {
                                    "type": "array",
                                    "items": { "type": "string" },
                                    "description": "Observations about the entity"
                                }
                            },
                            "required": ["name", "type"]
                        }
                    }
                },
                "required": ["entities"]
            }),
        )
    }

    async fn execute(&self, params: Value) -> StoreResult<Value> {
        let entities: Vec<Entity> = required_arg(&params, "entities")?;
        let created = self.kb.create_entities(entities).await?;
        json_content(&json!({ "entities": created }))
    }
}
