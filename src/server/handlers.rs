//! Request handlers for the MCP server
//!
//! Helpers for picking apart `tools/call` params and building the
//! `initialize` result.

use serde_json::{json, Value};

use crate::protocol::{ServerInfo, PROTOCOL_VERSION};

/// Extract tool arguments from params
pub fn extract_arguments(params: &Value) -> Value {
    params
        .get("arguments")
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
}

/// Extract tool name from params
pub fn extract_tool_name(params: &Value) -> Option<&str> {
    params.get("name").and_then(|v| v.as_str())
}

/// Result of the `initialize` handshake
pub fn initialize_result(info: &ServerInfo) -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": info.name,
            "version": info.version
        }
    })
}
