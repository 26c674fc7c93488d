//! Core types for the study tracker.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Plan lengths offered by the settings screen. Any duration in
/// `1..=MAX_PLAN_DURATION` is accepted.
pub const STANDARD_DURATIONS: [u32; 4] = [30, 60, 90, 180];

/// Longest plan the tracker will generate (ten years of days).
pub const MAX_PLAN_DURATION: u32 = 3650;

/// Longest review interval in days. Intervals grow geometrically on
/// repeated passes and are capped here.
pub const MAX_INTERVAL: u32 = 36_500;

/// Lowest ease factor a flashcard can reach.
pub const MINIMUM_EASE: f64 = 1.3;

/// Ease factor assigned to a card that has never been reviewed.
pub const INITIAL_EASE: f64 = 2.5;

/// A unit of learning content. Immutable once seeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub order_index: i64,
}

/// Practice exercise, optionally attached to a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub module_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: String,
}

/// Mind map; the planner only cares about its module link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mindmap {
    pub id: i64,
    pub module_id: Option<i64>,
    pub title: String,
}

/// SM-2 scheduling state of a flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<NaiveDate>,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            ease_factor: INITIAL_EASE,
            interval: 0,
            repetitions: 0,
            next_review: None,
        }
    }
}

impl ReviewState {
    /// A card is due when it was never scheduled or its date has arrived.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        match self.next_review {
            None => true,
            Some(date) => date <= today,
        }
    }
}

/// Flashcard with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: i64,
    pub module_id: Option<i64>,
    pub front: String,
    pub back: String,
    #[serde(flatten)]
    pub state: ReviewState,
}

/// Recall quality on the SM-2 0-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoreError::invalid(format!(
                "quality must be between 0 and 5, got {value}"
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Qualities below 3 count as a failed recall.
    pub fn is_pass(self) -> bool {
        self.0 >= 3
    }
}

impl TryFrom<i64> for Quality {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Quality> for i64 {
    fn from(quality: Quality) -> Self {
        i64::from(quality.0)
    }
}

/// Kind of work a daily activity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Module,
    Exercise,
    Mindmap,
    Flashcards,
    Lab,
    Reflection,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Exercise => "exercise",
            Self::Mindmap => "mindmap",
            Self::Flashcards => "flashcards",
            Self::Lab => "lab",
            Self::Reflection => "reflection",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "module" => Some(Self::Module),
            "exercise" => Some(Self::Exercise),
            "mindmap" => Some(Self::Mindmap),
            "flashcards" => Some(Self::Flashcards),
            "lab" => Some(Self::Lab),
            "reflection" => Some(Self::Reflection),
            _ => None,
        }
    }

    /// Activity kind that a progress record of `item_type` completes.
    pub fn for_progress_item(item_type: &str) -> Option<Self> {
        match item_type {
            "module" => Some(Self::Module),
            "exercise" => Some(Self::Exercise),
            "mindmap" => Some(Self::Mindmap),
            "flashcard" | "flashcards" => Some(Self::Flashcards),
            _ => None,
        }
    }

    /// Whether completion is matched on `activity_id` as well as type.
    pub fn is_item_linked(&self) -> bool {
        matches!(self, Self::Module | Self::Exercise | Self::Mindmap)
    }
}

/// Activity produced by the planner, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedActivity {
    pub day_number: u32,
    pub activity_type: ActivityType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<i64>,
    pub title: String,
    pub description: String,
}

/// Everything the planner reads. Modules are kept in planning order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    modules: Vec<Module>,
    exercises: Vec<Exercise>,
    flashcards: Vec<Flashcard>,
    mindmaps: Vec<Mindmap>,
}

impl Catalog {
    /// Build a catalog. Modules are sorted by `order_index`, then `id`;
    /// the other collections keep the order they were given in.
    pub fn new(
        mut modules: Vec<Module>,
        exercises: Vec<Exercise>,
        flashcards: Vec<Flashcard>,
        mindmaps: Vec<Mindmap>,
    ) -> Self {
        modules.sort_by_key(|m| (m.order_index, m.id));
        Self {
            modules,
            exercises,
            flashcards,
            mindmaps,
        }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    pub fn mindmaps(&self) -> &[Mindmap] {
        &self.mindmaps
    }
}

/// Singleton plan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    pub plan_duration: u32,
    pub current_day: u32,
    pub start_date: NaiveDate,
}

impl PlanSettings {
    pub fn new(plan_duration: u32, current_day: u32, start_date: NaiveDate) -> Result<Self> {
        let settings = Self {
            plan_duration,
            current_day,
            start_date,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        validate_plan_duration(self.plan_duration)?;
        validate_day_number(self.current_day)?;
        if self.current_day > self.plan_duration {
            return Err(CoreError::invalid(format!(
                "current day {} is past the end of a {}-day plan",
                self.current_day, self.plan_duration
            )));
        }
        Ok(())
    }

    /// Change the plan length, pulling the current day back inside it.
    pub fn with_duration(&self, plan_duration: u32) -> Result<Self> {
        validate_plan_duration(plan_duration)?;
        Ok(Self {
            plan_duration,
            current_day: self.current_day.min(plan_duration),
            start_date: self.start_date,
        })
    }

    pub fn can_advance(&self) -> bool {
        self.current_day < self.plan_duration
    }

    /// Move to the next day. Returns false at the end of the plan.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.current_day += 1;
        true
    }

    /// Calendar date the given plan day falls on.
    pub fn date_of_day(&self, day_number: u32) -> Result<NaiveDate> {
        let offset = Duration::days(i64::from(day_number.saturating_sub(1)));
        self.start_date.checked_add_signed(offset).ok_or_else(|| {
            CoreError::invalid(format!(
                "day {day_number} of a plan starting {} is out of the calendar range",
                self.start_date
            ))
        })
    }
}

pub fn validate_plan_duration(plan_duration: u32) -> Result<()> {
    if plan_duration == 0 {
        return Err(CoreError::invalid("plan duration must be at least 1 day"));
    }
    if plan_duration > MAX_PLAN_DURATION {
        return Err(CoreError::invalid(format!(
            "plan duration must be at most {MAX_PLAN_DURATION} days, got {plan_duration}"
        )));
    }
    Ok(())
}

pub fn validate_day_number(day_number: u32) -> Result<()> {
    if day_number == 0 {
        return Err(CoreError::invalid("day number must be at least 1"));
    }
    Ok(())
}

/// Status of a progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NotStarted,
    Attempted,
    Completed,
}

impl Default for ProgressStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Attempted => "attempted",
            Self::Completed => "completed",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "attempted" => Some(Self::Attempted),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}
