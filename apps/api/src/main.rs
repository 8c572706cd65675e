mod compiler;
mod config;
mod errors;
mod models;
mod render;
mod routes;
mod state;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compiler::LatexCompiler;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::templates::TemplateStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LaTeX resume service v{}", env!("CARGO_PKG_VERSION"));

    std::fs::create_dir_all(&config.work_dir).with_context(|| {
        format!("Failed to create work directory {}", config.work_dir.display())
    })?;
    // The compiler runs inside its scratch directory, so the root must be absolute
    let work_dir = std::fs::canonicalize(&config.work_dir)?;
    let compiler = LatexCompiler::new(config.compiler.clone(), work_dir, config.compile_timeout);
    // Compiler self-check: a broken toolchain is fatal at startup, not per request
    compiler.verify_installation().await?;

    let templates = Arc::new(TemplateStore::open(config.templates_dir.clone()));
    info!(
        "Template store ready: {} templates in {}",
        templates.len(),
        config.templates_dir.display()
    );

    let state = AppState {
        templates,
        compiler: Arc::new(compiler),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
