//! Route definitions

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::auth;
use super::handlers::{compute, health, AppState};

/// Router with the open health check and the authenticated method endpoints.
pub fn method_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/method/compute", post(compute))
        .route_layer(middleware::from_fn_with_state(state, auth::verify));

    Router::new().route("/health", get(health)).merge(protected)
}
