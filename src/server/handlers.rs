//! HTTP request handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::auth::AuthState;
use crate::config::ServerConfig;
use crate::engine::Executor;
use crate::store::TaskStore;

/// Shared application state
pub struct AppState {
    pub executor: Arc<Executor>,
    pub auth: AuthState,
    pub config: ServerConfig,
    pub miner_name: String,
    pub public_key: String,
    pub model: String,
    pub device: String,
    pub store: Option<Arc<TaskStore>>,
    pub started_at: Instant,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        name: state.miner_name.clone(),
        model: state.model.clone(),
        device: state.device.clone(),
        public_key: state.public_key.clone(),
        testnet: state.config.is_testnet(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    };
    (StatusCode::OK, Json(response))
}

/// Scoring endpoint
///
/// Tokenizes and scores every prompt in the task, returning top-k logits
/// per token position. The model runs on a blocking thread so the runtime
/// keeps answering health checks during long batches.
pub async fn compute(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ComputeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(json) => json,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &rejection.body_text(),
                "invalid_request_error",
            );
        }
    };

    if request.task.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "task must contain at least one prompt",
            "invalid_request_error",
        );
    }

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(%request_id, prompts = request.task.len(), "compute task received");

    if let Some(store) = &state.store {
        let store = store.clone();
        let task = request.task.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = store.append(&task) {
                tracing::warn!("failed to store task: {:#}", e);
            }
        });
    }

    let executor = state.executor.clone();
    let task = request.task;
    let result = tokio::task::spawn_blocking(move || executor.compute(&task)).await;

    match result {
        Ok(Ok(result)) => {
            tracing::info!(%request_id, elapsed = result.elapsed_time, "compute task finished");
            (StatusCode::OK, Json(result)).into_response()
        }
        Ok(Err(e)) => {
            tracing::error!(%request_id, "compute failed: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("compute failed: {}", e),
                "server_error",
            )
        }
        Err(e) => {
            tracing::error!(%request_id, "compute task panicked: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "compute task failed",
                "server_error",
            )
        }
    }
}

/// Uniform JSON error body.
pub(crate) fn error_response(status: StatusCode, message: &str, kind: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: ErrorDetail {
                message: message.to_string(),
                r#type: kind.to_string(),
            },
        }),
    )
        .into_response()
}

// Request/Response types

#[derive(Deserialize)]
pub struct ComputeRequest {
    pub task: Vec<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub model: String,
    pub device: String,
    pub public_key: String,
    pub testnet: bool,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
}
