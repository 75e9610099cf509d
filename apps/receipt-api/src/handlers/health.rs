//! Health probes.

use axum::extract::State;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Liveness: the process is up and routing requests.
pub async fn health() -> &'static str {
    "OK"
}

/// Readiness: the receipt store answers.
pub async fn ready(State(state): State<AppState>) -> ApiResult<&'static str> {
    if state.store.health_check().await {
        Ok("OK")
    } else {
        tracing::warn!("Readiness check failed: store not answering");
        Err(ApiError::Unavailable)
    }
}
