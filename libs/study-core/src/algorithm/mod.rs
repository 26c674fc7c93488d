//! Spaced repetition scheduling.

pub mod sm2;

use crate::error::Result;
use crate::types::{Quality, ReviewState};
use chrono::NaiveDate;

/// Result of scheduling a card after review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub new_state: ReviewState,
    pub next_review: NaiveDate,
}

/// Trait for spaced repetition schedulers.
pub trait ReviewScheduler: Send + Sync {
    /// Scheduler identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next scheduling state after a review done on `today`.
    fn schedule(&self, state: &ReviewState, quality: Quality, today: NaiveDate) -> ReviewOutcome;

    /// Initial state for a card that was never reviewed.
    fn initial_state(&self) -> ReviewState;
}

/// Validate a raw quality rating and run the default SM-2 scheduler.
pub fn next_state(quality: i64, state: &ReviewState, today: NaiveDate) -> Result<ReviewOutcome> {
    let quality = Quality::new(quality)?;
    Ok(sm2::Sm2::default().schedule(state, quality, today))
}
