//! SM-2 spaced repetition algorithm.
//!
//! Classic SuperMemo 2: a failed recall (quality < 3) restarts the
//! repetition sequence at a one day interval, a pass walks the 1, 6,
//! `interval * ease` ladder. The ease factor is adjusted on every review,
//! failures included, and never drops below the configured floor.
//! Intervals are capped at `maximum_interval` days and the due date
//! saturates at the end of the calendar, so every review has a result.

use super::{ReviewOutcome, ReviewScheduler};
use crate::types::{Quality, ReviewState, INITIAL_EASE, MAX_INTERVAL, MINIMUM_EASE};
use chrono::{Duration, NaiveDate};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE,
            minimum_ease: MINIMUM_EASE,
            first_interval: 1,
            second_interval: 6,
            maximum_interval: MAX_INTERVAL,
        }
    }
}

impl ReviewScheduler for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self) -> ReviewState {
        ReviewState {
            ease_factor: self.initial_ease,
            interval: 0,
            repetitions: 0,
            next_review: None,
        }
    }

    fn schedule(&self, state: &ReviewState, quality: Quality, today: NaiveDate) -> ReviewOutcome {
        let (interval, repetitions) = if quality.is_pass() {
            let interval = match state.repetitions {
                0 => self.first_interval,
                1 => self.second_interval,
                _ => self.grow(state.interval, state.ease_factor),
            };
            (interval.min(self.maximum_interval), state.repetitions.saturating_add(1))
        } else {
            (self.first_interval, 0)
        };

        let ease_factor = self.next_ease(state.ease_factor, quality);
        let next_review = today
            .checked_add_signed(Duration::days(i64::from(interval)))
            .unwrap_or(NaiveDate::MAX);

        ReviewOutcome {
            new_state: ReviewState {
                ease_factor,
                interval,
                repetitions,
                next_review: Some(next_review),
            },
            next_review,
        }
    }
}

impl Sm2 {
    /// round(interval * EF), clamped to the maximum interval.
    fn grow(&self, interval: u32, ease_factor: f64) -> u32 {
        let grown = (f64::from(interval) * ease_factor).round();
        if grown.is_nan() {
            return self.maximum_interval;
        }
        grown.clamp(0.0, f64::from(self.maximum_interval)) as u32
    }

    /// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored.
    fn next_ease(&self, ease_factor: f64, quality: Quality) -> f64 {
        let miss = f64::from(Quality::MAX - quality.value());
        let adjusted = ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
        adjusted.max(self.minimum_ease)
    }
}
