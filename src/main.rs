//! Neo4j Memory MCP Server - Binary Entry Point

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::{Builder, Runtime};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use neo4j_memory::api::{create_router, serve, AppState};
use neo4j_memory::backend::{GraphBackend, MemoryBackend, Neo4jBackend};
use neo4j_memory::config::{BackendKind, Config, Transport};
use neo4j_memory::knowledge_base::KnowledgeBase;
use neo4j_memory::server::McpServer;
use neo4j_memory::tools::register_all_tools;

/// How long shutdown waits on blocking tasks, such as a pending stdin read
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let config = Config::parse();
    let _log_guard = init_tracing(&config)?;
    info!(?config, "Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let outcome = runtime.block_on(run(config));
    shutdown(runtime);
    outcome
}

/// Stop the runtime without waiting on a stdin read that never completes
fn shutdown(runtime: Runtime) {
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}

async fn run(config: Config) -> Result<()> {

    let backend: Arc<dyn GraphBackend> = match config.backend {
        BackendKind::Neo4j => Arc::new(
            Neo4jBackend::connect(&config.neo4j_config())
                .await
                .context("failed to connect to Neo4j")?,
        ),
        BackendKind::Memory => {
            warn!("Using the in-memory backend; the graph is lost on exit");
            Arc::new(MemoryBackend::new())
        }
    };
    let kb = Arc::new(
        KnowledgeBase::open(backend)
            .await
            .context("failed to open the knowledge base")?,
    );

    let mut server = McpServer::new();
    register_all_tools(&mut server, kb.clone());
    let server = Arc::new(server);
    info!(tools = server.tool_count(), transport = ?config.transport, "MCP server ready");

    let outcome = match config.transport {
        Transport::Stdio => run_stdio(server.clone()).await,
        Transport::Http => run_http(&config, kb.clone(), server.clone()).await,
        Transport::Both => {
            let stdio = tokio::spawn(run_stdio(server.clone()));
            let outcome = run_http(&config, kb.clone(), server.clone()).await;
            stdio.abort();
            let _ = stdio.await;
            outcome
        }
    };
    if let Err(e) = &outcome {
        error!(error = %e, "Transport failed");
    }

    drop(server);
    match Arc::try_unwrap(kb) {
        Ok(kb) => {
            if let Err(e) = kb.close().await {
                warn!(error = %e, "Failed to close the knowledge base cleanly");
            }
        }
        Err(_) => warn!("Knowledge base still in use at shutdown, skipping close"),
    }
    info!("Server stopped");
    outcome
}

/// Serve stdio until the client closes stdin or Ctrl-C arrives
async fn run_stdio(server: Arc<McpServer>) -> Result<()> {
    tokio::select! {
        result = server.run_stdio() => {
            result.map_err(|e| anyhow::anyhow!("stdio transport failed: {}", e))?;
            info!("stdin closed");
        }
        _ = shutdown_signal() => {}
    }
    Ok(())
}

/// Serve HTTP until Ctrl-C arrives
async fn run_http(config: &Config, kb: Arc<KnowledgeBase>, server: Arc<McpServer>) -> Result<()> {
    let addr = config.http_addr()?;
    let router = create_router(Arc::new(AppState::new(kb, server)));
    serve(router, addr, shutdown_signal())
        .await
        .with_context(|| format!("HTTP server on {} failed", addr))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await
        }
    }
}

/// Logs go to stderr (stdout carries the stdio transport), plus an optional
/// daily-rotated file. RUST_LOG overrides the default filter.
fn init_tracing(config: &Config) -> Result<Option<WorkerGuard>> {
    let level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "neo4j_memory={level},neo4j_memory_server={level},tower_http={level}"
        ))
    });

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("log file path {} has no file name", path.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(guard)
}
