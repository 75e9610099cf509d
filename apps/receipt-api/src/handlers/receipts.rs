//! # Receipt Handlers
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /receipts/process                                                 │
//! │       │                                                                 │
//! │       ├── Json<ReceiptSubmission>   fails → 400 "Invalid JSON format"  │
//! │       ├── validate_receipt()        fails → 400 {"errors": [...]}      │
//! │       ├── calculate_points()        never fails                        │
//! │       ├── generate_receipt_id()                                        │
//! │       ├── store.save()              fails → 500                        │
//! │       └── 200 {"id": "..."}                                            │
//! │                                                                         │
//! │  GET /receipts/{id}/points   → 200 {"points": N}  | 404                 │
//! │  GET /receipts/{id}          → 200 full receipt   | 404                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use receipt_core::{calculate_points, validate_receipt, ReceiptSubmission, ScoredReceipt};
use receipt_db::generate_receipt_id;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

// =============================================================================
// Response Bodies
// =============================================================================

/// Response of `POST /receipts/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProcessReceiptResponse {
    pub id: String,
}

/// Response of `GET /receipts/{id}/points`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PointsResponse {
    pub points: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Validates, scores and stores a receipt; returns its new id.
pub async fn process_receipt(
    State(state): State<AppState>,
    payload: Result<Json<ReceiptSubmission>, JsonRejection>,
) -> ApiResult<Json<ProcessReceiptResponse>> {
    let Json(submission) = payload.map_err(|rejection| ApiError::InvalidJson(rejection.body_text()))?;

    let receipt = validate_receipt(&submission)?;
    let points = calculate_points(&receipt);

    let scored = ScoredReceipt {
        id: generate_receipt_id(),
        receipt,
        points,
        created_at: Utc::now(),
    };

    state.store.save(&scored).await?;

    info!(id = %scored.id, points, items = scored.receipt.items.len(), "Processed receipt");

    Ok(Json(ProcessReceiptResponse { id: scored.id }))
}

/// Returns the points awarded to a receipt.
pub async fn get_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PointsResponse>> {
    debug!(id = %id, "Looking up points");

    match state.store.get_points(&id).await? {
        Some(points) => Ok(Json(PointsResponse { points })),
        None => Err(ApiError::ReceiptNotFound(id)),
    }
}

/// Returns the stored receipt with its items, points and creation time.
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ScoredReceipt>> {
    debug!(id = %id, "Looking up receipt");

    state
        .store
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::ReceiptNotFound(id))
}
