//! API module for HTTP endpoints
//!
//! Serves MCP over `POST /mcp` plus a small read-only REST surface over the
//! same knowledge base.

pub mod http;
pub mod mcp;
pub mod rest;
pub mod state;

pub use http::{create_router, serve};
pub use state::AppState;
