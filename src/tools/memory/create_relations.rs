//! Create relations tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::{json_content, McpTool, Tool};
use crate::tools::required_arg;
use crate::types::Relation;

/// Tool for creating multiple relations between existing entities
pub struct CreateRelationsTool {
    kb: Arc<KnowledgeBase>,
}

impl CreateRelationsTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for CreateRelationsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "create_relations",
            "Create multiple new relations between entities in the knowledge graph. \
             Relations whose source or target entity does not exist are skipped.",
            json!({
                "type": "object",
                "properties": {
                    "relations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "source": { "type": "string", "description": "The source entity name" },
                                "target": { "type": "string", "description": "The target entity name" },
                                "relationType": {
                                    "type": "string",
                                    "pattern": "^[A-Za-z_][A-Za-z0-9_]*$",
                                    "description": "The type of relation"
                                }
                            },
                            "required": ["source", "target", "relationType"]
                        }
                    }
                },
                "required": ["relations"]
            }),
        )
    }

    async fn execute(&self, params: Value) -> StoreResult<Value> {
        let relations: Vec<Relation> = required_arg(&params, "relations")?;
        let created = self.kb.create_relations(relations).await?;
        json_content(&json!({ "relations": created }))
    }
}
