//! Flashcard review endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use study_core::Quality;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::{progress, today};
use crate::AppState;

/// GET /api/flashcards/due
pub async fn due(
    State(state): State<AppState>,
    Query(query): Query<DueFlashcardsQuery>,
) -> Result<Json<DueFlashcardsResponse>> {
    let today = today();
    let cards = state.db.get_due_flashcards(today, query.module_id).await?;

    Ok(Json(DueFlashcardsResponse {
        today,
        flashcards: cards.iter().map(DbFlashcard::to_core).collect(),
    }))
}

/// POST /api/flashcards/:id/review
pub async fn review(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    let quality = Quality::new(payload.quality)?;

    let card = state
        .db
        .get_flashcard(card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Flashcard {card_id} not found")))?;

    let current_state = card.review_state();
    let outcome = state.scheduler.schedule(&current_state, quality, today());

    state
        .db
        .update_review_state(card_id, &outcome.new_state)
        .await?;

    tracing::info!(
        card_id,
        quality = quality.value(),
        interval = outcome.new_state.interval,
        ease_factor = outcome.new_state.ease_factor,
        scheduler = state.scheduler.name(),
        "Flashcard reviewed"
    );

    let status = if quality.is_pass() {
        ProgressStatus::Completed
    } else {
        ProgressStatus::Attempted
    };
    let now = Utc::now();
    state
        .db
        .upsert_progress("flashcard", card_id, status, Some(f64::from(quality.value())), now)
        .await?;
    progress::complete_matching_activity(&state.db, "flashcard", card_id, now).await?;

    Ok(Json(ReviewResponse {
        flashcard_id: card_id,
        next_review: outcome.next_review,
        state: outcome.new_state,
    }))
}
