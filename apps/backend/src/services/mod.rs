//! Application services between routes and the store

pub mod plan;
pub mod progress;
pub mod seed;

use chrono::{NaiveDate, Utc};

/// Calendar date used for due checks, review scheduling and plan dates.
///
/// UTC, the same clock SQLite's `date('now')` reads when the default plan
/// row is created.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
