//! Delete relations tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::{json_content, McpTool, Tool};
use crate::tools::{required_arg, success};
use crate::types::Relation;

/// Tool for deleting multiple relations from the knowledge graph
pub struct DeleteRelationsTool {
    kb: Arc<KnowledgeBase>,
}

impl DeleteRelationsTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for DeleteRelationsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "delete_relations",
            "Delete multiple relations from the knowledge graph",
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
                                "relationType": { "type": "string", "description": "The type of relation" }
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
        self.kb.delete_relations(relations).await?;
        json_content(&success("Relations deleted successfully"))
    }
}
