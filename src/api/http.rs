//! HTTP server setup with Axum

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::mcp::{mcp_request_handler, server_info_handler};
use super::rest::{graph, nodes, search};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/", get(health_check))
        .route("/health", get(health_check))
        // MCP over HTTP
        .route("/mcp", post(mcp_request_handler))
        .route("/mcp/info", get(server_info_handler))
        // REST API endpoints
        .route("/api/graph", get(graph::get_graph))
        .route("/api/search", get(search::search_nodes))
        .route("/api/nodes", get(nodes::find_nodes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve the router until `shutdown` resolves
pub async fn serve<F>(router: Router, addr: SocketAddr, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Response for the health endpoints
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub backend: &'static str,
    pub timestamp: String,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        backend: state.kb.backend_name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::knowledge_base::KnowledgeBase;
    use crate::server::McpServer;
    use crate::tools::register_all_tools;
    use crate::types::Entity;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    async fn app() -> (Router, Arc<KnowledgeBase>, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let kb = Arc::new(KnowledgeBase::open(backend.clone()).await.unwrap());
        let mut mcp = McpServer::new();
        register_all_tools(&mut mcp, kb.clone());
        let state = Arc::new(AppState::new(kb.clone(), Arc::new(mcp)));
        (create_router(state), kb, backend)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _, _) = app().await;
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["backend"], "memory");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_graph_search_and_nodes() {
        let (app, kb, _) = app().await;
        kb.create_entities(vec![
            Entity::with_observations("Alice", "Person", ["likes tea"]),
            Entity::new("Bob", "Person"),
        ])
        .await
        .unwrap();

        let (status, body) = get_json(app.clone(), "/api/graph").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entities"].as_array().unwrap().len(), 2);

        let (status, body) = get_json(app.clone(), "/api/search?q=tea").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entities"][0]["name"], "Alice");

        let (status, body) = get_json(app.clone(), "/api/nodes?names=Bob&names=Alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entities"].as_array().unwrap().len(), 2);

        let (status, body) = get_json(app.clone(), "/api/nodes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");

        let (status, body) = get_json(app, "/api/search?q=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_nodes_accepts_names_with_commas_and_spaces() {
        let (app, kb, _) = app().await;
        kb.create_entities(vec![
            Entity::new("Smith, John", "Person"),
            Entity::new(" Padded ", "Person"),
            Entity::new("Smith", "Person"),
        ])
        .await
        .unwrap();

        let (status, body) = get_json(
            app,
            "/api/nodes?names=Smith%2C%20John&names=%20Padded%20",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let mut names: Vec<&str> = body["entities"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec![" Padded ", "Smith, John"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_maps_to_503() {
        let (app, _, backend) = app().await;
        backend.set_online(false);
        let (status, body) = get_json(app, "/api/graph").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "STORE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_mcp_endpoint() {
        let (app, _, _) = app().await;
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["id"], 7);
        assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 9);

        let notification = Request::builder()
            .method("POST")
            .uri("/mcp")
            .body(Body::from(
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            ))
            .unwrap();
        let response = app.clone().oneshot(notification).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let (status, info) = get_json(app, "/mcp/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(info["tool_count"], 9);
    }
}
