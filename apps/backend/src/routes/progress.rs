//! Progress endpoints

use axum::{extract::State, Json};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::progress;
use crate::AppState;

/// POST /api/progress
pub async fn record(
    State(state): State<AppState>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<ProgressResponse>> {
    if request.item_type.trim().is_empty() {
        return Err(ApiError::BadRequest("item_type must not be empty".to_string()));
    }

    let (record, activity_completed) = progress::record_progress(
        &state.db,
        &request.item_type,
        request.item_id,
        request.status,
        request.score,
        Utc::now(),
    )
    .await?;

    Ok(Json(ProgressResponse {
        progress: record.to_api(),
        activity_completed,
    }))
}

/// GET /api/progress/summary
pub async fn summary(State(state): State<AppState>) -> Result<Json<ProgressSummaryResponse>> {
    let items = state.db.progress_summary().await?;
    Ok(Json(ProgressSummaryResponse { items }))
}
