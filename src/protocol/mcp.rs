//! MCP (Model Context Protocol) types

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{StoreError, StoreResult};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP Tool definition
#[derive(Serialize, Debug, Clone)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl McpTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Server information for MCP handshake
#[derive(Clone, Debug)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::new("neo4j-memory", env!("CARGO_PKG_VERSION"))
    }
}

/// Trait for MCP tools
///
/// Failures are returned as `StoreError`; transports turn them into tool
/// results flagged `isError` rather than protocol errors.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition for tools/list
    fn definition(&self) -> McpTool;

    /// Execute the tool with the given arguments
    async fn execute(&self, params: Value) -> StoreResult<Value>;

    /// Get the tool name (convenience method)
    fn name(&self) -> String {
        self.definition().name
    }
}

/// Tool result carrying one text block
pub fn text_content(text: impl Into<String>) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": text.into()
        }]
    })
}

/// Tool result carrying a pretty-printed JSON document
pub fn json_content<T: Serialize>(value: &T) -> StoreResult<Value> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::backend(format!("failed to encode result: {}", e)))?;
    Ok(text_content(text))
}

/// Tool result describing a failed call
pub fn error_content(error: &StoreError) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": format!("Error: {}: {}", error.kind(), error)
        }],
        "isError": true,
        "errorKind": error.kind()
    })
}
