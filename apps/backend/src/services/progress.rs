//! Progress tracking and the activity auto-completion side effect

use chrono::{DateTime, Utc};
use study_core::ActivityType;

use crate::db::Database;
use crate::error::Result;
use crate::models::{DbProgress, ProgressStatus};

/// Complete the current day's activity matching a finished item.
///
/// Module, exercise and mind map activities match on their item id; the
/// flashcard review activity matches on type alone.
pub async fn complete_matching_activity(
    db: &Database,
    item_type: &str,
    item_id: i64,
    now: DateTime<Utc>,
) -> Result<bool> {
    let Some(activity_type) = ActivityType::for_progress_item(item_type) else {
        return Ok(false);
    };
    let settings = db.get_plan_settings().await?;
    let linked_id = activity_type.is_item_linked().then_some(item_id);

    let completed = db
        .complete_matching_activity(settings.current_day, activity_type, linked_id, now)
        .await?;
    if completed {
        tracing::info!(
            day = settings.current_day,
            activity_type = activity_type.as_str(),
            item_id,
            "Auto-completed daily activity"
        );
    }
    Ok(completed)
}

/// Store a progress update; a completion also completes today's activity
pub async fn record_progress(
    db: &Database,
    item_type: &str,
    item_id: i64,
    status: ProgressStatus,
    score: Option<f64>,
    now: DateTime<Utc>,
) -> Result<(DbProgress, bool)> {
    let progress = db
        .upsert_progress(item_type, item_id, status, score, now)
        .await?;

    let activity_completed = if status == ProgressStatus::Completed {
        complete_matching_activity(db, item_type, item_id, now).await?
    } else {
        false
    };

    Ok((progress, activity_completed))
}

/// Record that a module or mind map page was opened
pub async fn record_view(
    db: &Database,
    item_type: &str,
    item_id: i64,
    now: DateTime<Utc>,
) -> Result<bool> {
    db.touch_progress(item_type, item_id, now).await?;
    complete_matching_activity(db, item_type, item_id, now).await
}
