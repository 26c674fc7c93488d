//! Plan and daily activity endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use study_core::STANDARD_DURATIONS;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::plan;
use crate::AppState;

/// GET /api/plan
pub async fn overview(State(state): State<AppState>) -> Result<Json<PlanResponse>> {
    let settings = state.db.get_plan_settings().await?;
    let day = plan::load_day(&state.db, i64::from(settings.current_day)).await?;

    Ok(Json(PlanResponse {
        settings,
        today: day.summary(),
        standard_durations: STANDARD_DURATIONS.to_vec(),
    }))
}

/// PUT /api/plan/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdatePlanSettingsRequest>,
) -> Result<Json<PlanSettings>> {
    let settings = plan::update_settings(&state.db, &request).await?;
    Ok(Json(settings))
}

/// POST /api/plan/advance
pub async fn advance(State(state): State<AppState>) -> Result<Json<AdvanceResponse>> {
    let (advanced, settings) = plan::advance_day(&state.db).await?;
    Ok(Json(AdvanceResponse { advanced, settings }))
}

/// GET /api/plan/days/:day
pub async fn day(
    State(state): State<AppState>,
    Path(day_number): Path<i64>,
) -> Result<Json<DayResponse>> {
    let day = plan::load_day(&state.db, day_number).await?;
    Ok(Json(DayResponse {
        day_number: day.day_number,
        date: day.date,
        activities: day.activities,
        complete: day.complete,
    }))
}

/// POST /api/plan/activities/:id/toggle
pub async fn toggle_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
) -> Result<Json<DailyActivity>> {
    let activity = state
        .db
        .toggle_activity(activity_id, Utc::now())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Activity {activity_id} not found")))?;

    Ok(Json(activity.to_api()?))
}
