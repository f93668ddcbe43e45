//! HTTP server
//!
//! Authenticated JSON API for compute tasks.

pub mod auth;
mod handlers;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handlers::AppState;
pub use routes::method_routes;

/// Start the HTTP server and block until it exits.
pub async fn start(state: Arc<AppState>) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = method_routes(state.clone())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(
            state.config.max_concurrent_requests,
        ))
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .with_state(state.clone());

    let addr = state.config.addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Miner '{}' listening on http://{}", state.miner_name, addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health - Health check");
    tracing::info!("  POST /method/compute - Score a task (authenticated)");
    if state.config.is_testnet() {
        tracing::info!("Serving subnet {} (testnet)", state.config.subnet_uid);
    } else {
        tracing::info!("Serving subnet {}", state.config.subnet_uid);
    }

    axum::serve(listener, app).await?;

    Ok(())
}
