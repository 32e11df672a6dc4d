//! Search endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::ApiError;
use crate::api::state::AppState;
use crate::types::KnowledgeGraph;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Full-text query string
    pub q: Option<String>,
}

/// GET /api/search - Search nodes in the knowledge graph
///
/// Matches entity names, types and observations through the full-text index
/// and returns the matches with their direct neighbours.
pub async fn search_nodes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<KnowledgeGraph>, ApiError> {
    let Some(query) = params.q else {
        return Err(ApiError::bad_request("Query parameter 'q' is required"));
    };
    Ok(Json(state.kb.search_nodes(&query).await?))
}
