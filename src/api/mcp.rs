//! MCP over HTTP: one JSON-RPC message per request body

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::state::AppState;
use crate::protocol::PROTOCOL_VERSION;

/// POST /mcp - Handle JSON-RPC requests
///
/// The body is dispatched as raw text so malformed JSON gets a JSON-RPC parse
/// error rather than an HTTP rejection. Notifications are acknowledged with
/// `202 Accepted` and an empty body.
pub async fn mcp_request_handler(State(state): State<Arc<AppState>>, body: String) -> Response {
    match state.mcp.handle_message(&body).await {
        Some(reply) => (StatusCode::OK, Json(reply)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// GET /mcp/info - Get server info
#[derive(Debug, Serialize)]
pub struct ServerInfoResponse {
    pub name: String,
    pub version: String,
    pub protocol_version: &'static str,
    pub tool_count: usize,
    pub backend: &'static str,
}

pub async fn server_info_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let server_info = state.mcp.server_info();
    Json(ServerInfoResponse {
        name: server_info.name.clone(),
        version: server_info.version.clone(),
        protocol_version: PROTOCOL_VERSION,
        tool_count: state.mcp.tool_count(),
        backend: state.kb.backend_name(),
    })
}
