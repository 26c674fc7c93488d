//! Plan regeneration policy
//!
//! The planner is re-run for a day when its list is empty at access time,
//! for every day when the plan duration changes, and for the new day when
//! the current day moves.

use chrono::NaiveDate;
use study_core::{is_day_complete, ActivityPlanner, PlanSettings, PlannedActivity};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{DailyActivity, DaySummary, DbDailyActivity, UpdatePlanSettingsRequest};

/// Activities of one day plus its completion state
#[derive(Debug, Clone)]
pub struct DayView {
    pub day_number: u32,
    pub date: NaiveDate,
    pub activities: Vec<DailyActivity>,
    pub complete: bool,
}

impl DayView {
    pub fn summary(&self) -> DaySummary {
        DaySummary {
            day_number: self.day_number,
            date: self.date,
            total: self.activities.len(),
            completed: self.activities.iter().filter(|a| a.completed).count(),
            complete: self.complete,
        }
    }
}

/// Load a day, generating it first if it has no activities yet
pub async fn load_day(db: &Database, day_number: i64) -> Result<DayView> {
    let settings = db.get_plan_settings().await?;
    let day_number = check_day(&settings, day_number)?;

    let mut rows = db.get_day_activities(day_number).await?;
    if rows.is_empty() {
        regenerate_day(db, &settings, day_number).await?;
        rows = db.get_day_activities(day_number).await?;
    }

    day_view(&settings, day_number, rows)
}

/// Rebuild one day as a full replacement
pub async fn regenerate_day(db: &Database, settings: &PlanSettings, day_number: u32) -> Result<()> {
    let activities = plan_day(db, settings, day_number).await?;
    db.replace_day_activities(day_number, &activities).await
}

/// Save `settings` and rebuild every day of its plan in one transaction
pub async fn regenerate_plan(db: &Database, settings: &PlanSettings) -> Result<()> {
    let catalog = db.load_catalog().await?;
    let planner = ActivityPlanner::new(settings.plan_duration)?;

    let days = (1..=settings.plan_duration)
        .map(|day| Ok((day, planner.generate_day(day, &catalog)?)))
        .collect::<study_core::Result<Vec<_>>>()?;

    tracing::info!(
        plan_duration = settings.plan_duration,
        modules = catalog.modules().len(),
        "Regenerating full plan"
    );
    db.replace_plan(settings, &days).await
}

/// Apply a settings change and run whatever regeneration it triggers
pub async fn update_settings(
    db: &Database,
    request: &UpdatePlanSettingsRequest,
) -> Result<PlanSettings> {
    let current = db.get_plan_settings().await?;
    let mut updated = current.clone();

    if let Some(duration) = request.plan_duration {
        updated = updated.with_duration(to_positive(duration, "plan duration")?)?;
    }
    if let Some(day) = request.current_day {
        updated.current_day = to_positive(day, "current day")?;
    }
    updated.validate()?;

    if updated.plan_duration != current.plan_duration {
        regenerate_plan(db, &updated).await?;
    } else if updated.current_day != current.current_day {
        let activities = plan_day(db, &updated, updated.current_day).await?;
        db.save_settings_with_day(&updated, updated.current_day, &activities)
            .await?;
    } else {
        return Ok(updated);
    }

    tracing::info!(
        plan_duration = updated.plan_duration,
        current_day = updated.current_day,
        "Plan settings updated"
    );
    Ok(updated)
}

/// Move to the next day. Returns false once the plan has ended.
pub async fn advance_day(db: &Database) -> Result<(bool, PlanSettings)> {
    let mut settings = db.get_plan_settings().await?;
    if !settings.advance() {
        tracing::info!(day = settings.current_day, "Plan already at its last day");
        return Ok((false, settings));
    }

    let activities = plan_day(db, &settings, settings.current_day).await?;
    db.save_settings_with_day(&settings, settings.current_day, &activities)
        .await?;

    tracing::info!(day = settings.current_day, "Advanced to next day");
    Ok((true, settings))
}

async fn plan_day(
    db: &Database,
    settings: &PlanSettings,
    day_number: u32,
) -> Result<Vec<PlannedActivity>> {
    let catalog = db.load_catalog().await?;
    let activities =
        ActivityPlanner::new(settings.plan_duration)?.generate_day(day_number, &catalog)?;

    tracing::debug!(
        day = day_number,
        activities = activities.len(),
        "Regenerating day"
    );
    Ok(activities)
}

fn day_view(
    settings: &PlanSettings,
    day_number: u32,
    rows: Vec<DbDailyActivity>,
) -> Result<DayView> {
    let complete = is_day_complete(rows.iter().map(|a| a.completed));
    Ok(DayView {
        day_number,
        date: settings.date_of_day(day_number)?,
        activities: rows
            .iter()
            .map(DbDailyActivity::to_api)
            .collect::<Result<Vec<_>>>()?,
        complete,
    })
}

fn check_day(settings: &PlanSettings, day_number: i64) -> Result<u32> {
    let day = to_positive(day_number, "day number")?;
    if day > settings.plan_duration {
        return Err(ApiError::InvalidInput(format!(
            "day {day} is outside the {}-day plan",
            settings.plan_duration
        )));
    }
    Ok(day)
}

fn to_positive(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| ApiError::InvalidInput(format!("{field} must be a positive integer, got {value}")))
}
