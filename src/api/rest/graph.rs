//! Graph endpoint - Full graph snapshot

use std::sync::Arc;

use axum::{extract::State, Json};

use super::ApiError;
use crate::api::state::AppState;
use crate::types::KnowledgeGraph;

/// GET /api/graph - Get full graph snapshot
pub async fn get_graph(State(state): State<Arc<AppState>>) -> Result<Json<KnowledgeGraph>, ApiError> {
    Ok(Json(state.kb.read_graph().await?))
}
