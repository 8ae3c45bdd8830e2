mod config;
mod error;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, LogFormat},
    state::AppState,
};
use logbook_core::FileRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Phase 1: Basic tracing so we can log during config loading
    // Uses set_default (thread-local) so it can be replaced by Phase 2's global subscriber
    let _basic_tracing = init_tracing_basic();

    info!("Starting Logbook Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    // Phase 2: Re-initialize tracing with config (format, level)
    // Drop the phase-1 thread-local guard so the global subscriber slot is free
    drop(_basic_tracing);
    init_tracing_from_config(&config);

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.server.bind_address);

    // Load the registry from its persisted document (absent file = empty)
    let registry = FileRegistry::load(&config.registry.path)
        .context("Failed to load log file registry")?;
    info!(
        "Registry ready with {} tracked file(s) at {}",
        registry.len(),
        config.registry.path
    );

    // Create application state
    let state = AppState::new(config.clone(), registry);

    // Build the application router
    let app = build_router(state);

    // Parse bind address
    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .context("Invalid bind address")?;

    info!("Starting HTTP server...");
    info!("  - Register: POST http://{}/api/logs/register", addr);
    info!("  - List files: GET http://{}/api/logs/files", addr);
    info!("  - Health check: http://{}/health", addr);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("✓ Logbook Server is ready!");
    info!("Listening on: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Build the application router
fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = if state.config.server.enable_cors {
        // Use the actual origins from config
        let origins = state
            .config
            .server
            .cors_origins
            .iter()
            .filter_map(|s| s.parse::<axum::http::HeaderValue>().ok())
            .collect::<Vec<_>>();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        // When CORS is disabled, use a restrictive layer (same-origin only)
        CorsLayer::new()
    };

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let max_body_bytes = state.config.server.max_body_bytes;

    Router::new()
        // Health + root endpoints
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        // Log registry API
        .merge(routes::api_router())
        .layer(
            ServiceBuilder::new()
                // Request bodies are small JSON documents
                .layer(DefaultBodyLimit::max(max_body_bytes))
                // Request/response logging
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                // Timeout for requests (prevents indefinitely hanging connections)
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
        .with_state(state)
}

/// Root handler - shows API info
async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Logbook Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "register": "POST /api/logs/register",
            "files": "GET /api/logs/files",
            "delete": "DELETE /api/logs/files/{id}",
            "entries": "GET /api/logs/{id}",
            "health": "/health"
        }
    }))
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "files": state.registry.len(),
    }))
}

/// Phase 1: Basic tracing init so we can log during config loading.
/// Uses RUST_LOG env var or a sensible default.
fn init_tracing_basic() -> tracing::subscriber::DefaultGuard {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,logbook_server=debug"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Phase 2: Re-initialize tracing with configuration values.
/// This replaces the global subscriber with one that respects config.
fn init_tracing_from_config(config: &AppConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Prefer RUST_LOG env var, fall back to config level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_target(true).with_thread_ids(true);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
