//! Core study-plan library used by the backend.
//!
//! Provides:
//! - SM-2 review scheduling for flashcards
//! - Daily activity planning over the module catalog
//! - Mind map coverage checks
//! - Shared types (Module, Flashcard, PlanSettings, etc.)

pub mod algorithm;
pub mod coverage;
pub mod error;
pub mod planner;
pub mod types;

pub use algorithm::{next_state, ReviewOutcome, ReviewScheduler};
pub use coverage::{mindmap_coverage, CoverageReport};
pub use error::{CoreError, Result};
pub use planner::{generate_day, is_day_complete, ActivityPlanner};
pub use types::{
    ActivityType, Catalog, Exercise, Flashcard, Mindmap, Module, PlanSettings, PlannedActivity,
    ProgressStatus, Quality, ReviewState, MAX_INTERVAL, MAX_PLAN_DURATION, MINIMUM_EASE,
    STANDARD_DURATIONS,
};
