//! PhishGuard API Server
//!
//! Single JSON API for the URL-phishing and SMS-smishing scan paths.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     PHISHGUARD API                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌─────────────────────────────────────┐ │
//! │  │  Router   │   │  DetectionEngine (read-only)        │ │
//! │  │  (Axum)   │──▶│  models / schema / whitelist /      │ │
//! │  │           │   │  vectorizer / attribution baseline  │ │
//! │  └───────────┘   └─────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! All artifacts load once at startup; a missing model or schema refuses to
//! serve. Requests share the engine read-only, so there is no locking on
//! the hot path.

mod config;
mod error;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phishguard_core::DetectionEngine;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "phishguard_api=debug,phishguard_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("PhishGuard API starting...");
    tracing::info!("Artifact directory: {}", config.artifact_dir.display());

    // Load all detection artifacts; absence of a required one is fatal.
    let engine = DetectionEngine::load(&config.artifact_paths(), config.explain_enabled)
        .context("failed to load detection artifacts")?;

    let state = AppState {
        engine: Arc::new(engine),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DetectionEngine>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/engine/status", get(handlers::engine::status))
        .route("/api/v1/scan/url", post(handlers::scan::scan_url))
        .route("/api/v1/scan/sms", post(handlers::scan::scan_sms))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
