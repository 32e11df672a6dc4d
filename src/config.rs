//! Server configuration
//!
//! Every setting can come from a command-line flag or an environment
//! variable; flags win.

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};

use crate::backend::Neo4jConfig;

pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";

/// Which graph backend serves the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Neo4j over bolt
    Neo4j,
    /// In-process graph, lost on exit
    Memory,
}

/// How MCP clients reach the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// HTTP only
    Http,
    /// stdio and HTTP in the same process
    Both,
}

#[derive(Parser, Clone)]
#[command(name = "neo4j-memory-server")]
#[command(about = "Knowledge graph memory for MCP clients, backed by Neo4j")]
#[command(version)]
pub struct Config {
    /// Neo4j bolt URI (falls back to NEO4J_URL)
    #[arg(long, env = "NEO4J_URI")]
    pub neo4j_uri: Option<String>,

    /// Neo4j user
    #[arg(long, env = "NEO4J_USER", default_value = "neo4j")]
    pub neo4j_user: String,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD", default_value = "password", hide_env_values = true, hide_default_value = true)]
    pub neo4j_password: String,

    /// Neo4j database name
    #[arg(long, env = "NEO4J_DATABASE", default_value = "neo4j")]
    pub neo4j_database: String,

    /// Size of the Neo4j connection pool
    #[arg(long, env = "NEO4J_MAX_CONNECTIONS", default_value_t = 16)]
    pub max_connections: usize,

    /// Graph backend
    #[arg(long, env = "MEMORY_BACKEND", value_enum, default_value_t = BackendKind::Neo4j)]
    pub backend: BackendKind,

    /// Transport to serve MCP on
    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Host to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the HTTP server
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Enable debug logging
    #[arg(long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,

    /// Also write logs to this file, rotated daily
    #[arg(long, env = "LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Effective bolt URI: `--neo4j-uri`/NEO4J_URI, then NEO4J_URL, then the default
    pub fn neo4j_uri(&self) -> String {
        resolve_uri(self.neo4j_uri.clone(), std::env::var("NEO4J_URL").ok())
    }

    pub fn neo4j_config(&self) -> Neo4jConfig {
        Neo4jConfig {
            uri: self.neo4j_uri(),
            user: self.neo4j_user.clone(),
            password: self.neo4j_password.clone(),
            database: self.neo4j_database.clone(),
            max_connections: self.max_connections,
        }
    }

    /// Address the HTTP server binds to
    pub fn http_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("{} did not resolve to any address", self.host))
    }
}

fn resolve_uri(explicit: Option<String>, fallback: Option<String>) -> String {
    explicit
        .filter(|u| !u.trim().is_empty())
        .or(fallback.filter(|u| !u.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_NEO4J_URI.to_string())
}

// Hand-written so the password never reaches the logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("neo4j_uri", &self.neo4j_uri())
            .field("neo4j_user", &self.neo4j_user)
            .field("neo4j_password", &"***")
            .field("neo4j_database", &self.neo4j_database)
            .field("max_connections", &self.max_connections)
            .field("backend", &self.backend)
            .field("transport", &self.transport)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("debug", &self.debug)
            .field("log_file", &self.log_file)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uri_order() {
        assert_eq!(
            resolve_uri(Some("bolt://a:7687".into()), Some("bolt://b:7687".into())),
            "bolt://a:7687"
        );
        assert_eq!(resolve_uri(None, Some("bolt://b:7687".into())), "bolt://b:7687");
        assert_eq!(resolve_uri(Some(" ".into()), None), DEFAULT_NEO4J_URI);
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "neo4j-memory-server",
            "--backend",
            "memory",
            "--transport",
            "both",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--neo4j-password",
            "s3cret",
        ])
        .unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.transport, Transport::Both);
        assert_eq!(config.http_addr().unwrap(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.neo4j_config().password, "s3cret");
    }

    #[test]
    fn test_debug_hides_password() {
        let config = Config::try_parse_from([
            "neo4j-memory-server",
            "--neo4j-password",
            "hunter2",
        ])
        .unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn test_rejects_unknown_transport() {
        assert!(Config::try_parse_from(["neo4j-memory-server", "--transport", "sse"]).is_err());
    }
}
