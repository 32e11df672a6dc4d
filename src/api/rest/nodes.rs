//! Nodes endpoint - entities looked up by name

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::ApiError;
use crate::api::state::AppState;
use crate::types::KnowledgeGraph;

/// Every `names` value in query order, kept verbatim so names may contain
/// commas or surrounding spaces
fn names_param(pairs: Vec<(String, String)>) -> Vec<String> {
    pairs
        .into_iter()
        .filter(|(key, _)| key == "names")
        .map(|(_, value)| value)
        .collect()
}

/// GET /api/nodes?names=A&names=B - Find entities by name
pub async fn find_nodes(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<KnowledgeGraph>, ApiError> {
    let names = names_param(pairs);
    if names.is_empty() {
        return Err(ApiError::bad_request("Query parameter 'names' is required"));
    }
    Ok(Json(state.kb.find_nodes(names).await?))
}
