//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;

// Re-export shared types from study-core
pub use study_core::{
    ActivityType, CoverageReport, Exercise, Flashcard, Mindmap, Module, PlanSettings,
    PlannedActivity, ProgressStatus, ReviewState,
};

// === Database Entity Types ===

/// Module row, including its free-text content
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbModule {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub order_index: i64,
    pub summary: String,
    pub content: String,
}

impl DbModule {
    /// Convert to the planner's module type
    pub fn to_core(&self) -> Module {
        Module {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            category: self.category.clone(),
            order_index: self.order_index,
        }
    }
}

/// Exercise row (`type` is selected as `kind`)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbExercise {
    pub id: i64,
    pub module_id: Option<i64>,
    pub kind: String,
    pub prompt: String,
    pub answer: Option<String>,
}

impl DbExercise {
    pub fn to_core(&self) -> Exercise {
        Exercise {
            id: self.id,
            module_id: self.module_id,
            kind: self.kind.clone(),
            prompt: self.prompt.clone(),
        }
    }
}

/// Flashcard row with its scheduling columns
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFlashcard {
    pub id: i64,
    pub module_id: Option<i64>,
    pub front: String,
    pub back: String,
    pub ease_factor: f64,
    pub interval: i64,
    pub repetitions: i64,
    pub next_review: Option<NaiveDate>,
}

impl DbFlashcard {
    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            ease_factor: self.ease_factor,
            interval: self.interval.max(0) as u32,
            repetitions: self.repetitions.max(0) as u32,
            next_review: self.next_review,
        }
    }

    pub fn to_core(&self) -> Flashcard {
        Flashcard {
            id: self.id,
            module_id: self.module_id,
            front: self.front.clone(),
            back: self.back.clone(),
            state: self.review_state(),
        }
    }
}

/// Mind map row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMindmap {
    pub id: i64,
    pub module_id: Option<i64>,
    pub title: String,
    pub content: String,
}

impl DbMindmap {
    pub fn to_core(&self) -> Mindmap {
        Mindmap {
            id: self.id,
            module_id: self.module_id,
            title: self.title.clone(),
        }
    }
}

/// Daily activity row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDailyActivity {
    pub id: i64,
    pub day_number: i64,
    pub position: i64,
    pub activity_type: String,
    pub activity_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DbDailyActivity {
    /// Convert to API activity type, rejecting rows with an unknown kind
    pub fn to_api(&self) -> Result<DailyActivity, ApiError> {
        let activity_type = ActivityType::from_str(&self.activity_type).ok_or_else(|| {
            ApiError::Internal(format!(
                "activity {} has unknown type '{}'",
                self.id, self.activity_type
            ))
        })?;

        Ok(DailyActivity {
            id: self.id,
            day_number: self.day_number.max(1) as u32,
            activity_type,
            activity_id: self.activity_id,
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
            completed_at: self.completed_at,
        })
    }
}

/// Plan settings singleton row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPlanSettings {
    pub plan_duration: i64,
    pub current_day: i64,
    pub start_date: NaiveDate,
}

impl DbPlanSettings {
    /// Convert to core settings, rejecting rows that break the plan invariants
    pub fn to_core(&self) -> study_core::Result<PlanSettings> {
        PlanSettings::new(
            u32::try_from(self.plan_duration).unwrap_or(0),
            u32::try_from(self.current_day).unwrap_or(0),
            self.start_date,
        )
    }
}

/// Progress row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProgress {
    pub item_type: String,
    pub item_id: i64,
    pub status: String,
    pub score: Option<f64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl DbProgress {
    pub fn to_api(&self) -> ProgressRecord {
        ProgressRecord {
            item_type: self.item_type.clone(),
            item_id: self.item_id,
            status: ProgressStatus::from_str(&self.status).unwrap_or_default(),
            score: self.score,
            completed_at: self.completed_at,
            last_seen: self.last_seen,
        }
    }
}

/// Row of the progress summary query
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressCount {
    pub item_type: String,
    pub status: String,
    pub count: i64,
}

// === Seed Types ===

/// Module entry of `modules.json`
#[derive(Debug, Clone, Deserialize)]
pub struct SeedModule {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub category: String,
    pub order_index: Option<i64>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
}

/// Exercise entry of `exercises.json`
#[derive(Debug, Clone, Deserialize)]
pub struct SeedExercise {
    pub module_id: Option<i64>,
    #[serde(rename = "type", default = "default_exercise_kind")]
    pub kind: String,
    pub prompt: String,
    pub answer: Option<String>,
}

fn default_exercise_kind() -> String {
    "practice".to_string()
}

/// Flashcard entry of `flashcards.json`
#[derive(Debug, Clone, Deserialize)]
pub struct SeedFlashcard {
    pub module_id: Option<i64>,
    pub front: String,
    pub back: String,
}

/// Mind map entry of `mindmaps.json`
#[derive(Debug, Clone, Deserialize)]
pub struct SeedMindmap {
    pub module_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Full seed catalog, inserted in one transaction
#[derive(Debug, Clone, Default)]
pub struct SeedCatalog {
    pub modules: Vec<SeedModule>,
    pub exercises: Vec<SeedExercise>,
    pub flashcards: Vec<SeedFlashcard>,
    pub mindmaps: Vec<SeedMindmap>,
}

/// Row counts written by a seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedCounts {
    pub modules: usize,
    pub exercises: usize,
    pub flashcards: usize,
    pub mindmaps: usize,
}

// === API Request/Response Types ===

/// Persisted daily activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyActivity {
    pub id: i64,
    pub day_number: u32,
    pub activity_type: ActivityType,
    pub activity_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Progress record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub item_type: String,
    pub item_id: i64,
    pub status: ProgressStatus,
    pub score: Option<f64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModuleListResponse {
    pub modules: Vec<Module>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModuleDetailResponse {
    pub module: Module,
    pub summary: String,
    pub content: String,
    pub exercises: Vec<Exercise>,
    pub mindmaps: Vec<Mindmap>,
    pub flashcard_count: usize,
    pub activity_completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MindmapDetailResponse {
    pub mindmap: Mindmap,
    pub content: String,
    pub activity_completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DaySummary {
    pub day_number: u32,
    pub date: NaiveDate,
    pub total: usize,
    pub completed: usize,
    pub complete: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub settings: PlanSettings,
    pub today: DaySummary,
    pub standard_durations: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePlanSettingsRequest {
    pub plan_duration: Option<i64>,
    pub current_day: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub advanced: bool,
    pub settings: PlanSettings,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayResponse {
    pub day_number: u32,
    pub date: NaiveDate,
    pub activities: Vec<DailyActivity>,
    pub complete: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DueFlashcardsQuery {
    pub module_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DueFlashcardsResponse {
    pub today: NaiveDate,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub quality: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub flashcard_id: i64,
    pub state: ReviewState,
    pub next_review: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressRequest {
    pub item_type: String,
    pub item_id: i64,
    pub status: ProgressStatus,
    pub score: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub progress: ProgressRecord,
    pub activity_completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressSummaryResponse {
    pub items: Vec<ProgressCount>,
}
