//! SQLite database operations

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool, Transaction,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use study_core::Catalog;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the SQLite store, creating the file if it does not exist
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives and dies with its connection.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // === Catalog Repository ===

    /// All modules in planning order
    pub async fn list_modules(&self) -> Result<Vec<DbModule>> {
        let modules = sqlx::query_as::<_, DbModule>(
            r#"
            SELECT id, title, slug, category, order_index, summary, content
            FROM modules
            ORDER BY order_index, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(modules)
    }

    /// Get module by slug
    pub async fn get_module_by_slug(&self, slug: &str) -> Result<Option<DbModule>> {
        let module = sqlx::query_as::<_, DbModule>(
            r#"
            SELECT id, title, slug, category, order_index, summary, content
            FROM modules
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(module)
    }

    pub async fn count_modules(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM modules")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// All exercises in catalog insertion order, optionally for one module
    pub async fn list_exercises(&self, module_id: Option<i64>) -> Result<Vec<DbExercise>> {
        let exercises = sqlx::query_as::<_, DbExercise>(
            r#"
            SELECT id, module_id, type AS kind, prompt, answer
            FROM exercises
            WHERE ?1 IS NULL OR module_id = ?1
            ORDER BY id
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    /// All mind maps, optionally for one module
    pub async fn list_mindmaps(&self, module_id: Option<i64>) -> Result<Vec<DbMindmap>> {
        let mindmaps = sqlx::query_as::<_, DbMindmap>(
            r#"
            SELECT id, module_id, title, content
            FROM mindmaps
            WHERE ?1 IS NULL OR module_id = ?1
            ORDER BY id
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(mindmaps)
    }

    /// Get mind map by ID
    pub async fn get_mindmap(&self, mindmap_id: i64) -> Result<Option<DbMindmap>> {
        let mindmap = sqlx::query_as::<_, DbMindmap>(
            r#"
            SELECT id, module_id, title, content
            FROM mindmaps
            WHERE id = ?
            "#,
        )
        .bind(mindmap_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mindmap)
    }

    /// Read every catalog the planner needs
    pub async fn load_catalog(&self) -> Result<Catalog> {
        let modules = self.list_modules().await?;
        let exercises = self.list_exercises(None).await?;
        let flashcards = self.list_flashcards(None).await?;
        let mindmaps = self.list_mindmaps(None).await?;

        Ok(Catalog::new(
            modules.iter().map(DbModule::to_core).collect(),
            exercises.iter().map(DbExercise::to_core).collect(),
            flashcards.iter().map(DbFlashcard::to_core).collect(),
            mindmaps.iter().map(DbMindmap::to_core).collect(),
        ))
    }

    /// Insert a full catalog in one transaction. Modules keep file order ids.
    pub async fn seed_catalog(&self, seed: &SeedCatalog) -> Result<SeedCounts> {
        let mut tx = self.pool.begin().await?;

        for (position, module) in seed.modules.iter().enumerate() {
            let id = position as i64 + 1;
            sqlx::query(
                r#"
                INSERT INTO modules (id, title, slug, category, order_index, summary, content)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(&module.title)
            .bind(&module.slug)
            .bind(&module.category)
            .bind(module.order_index.unwrap_or(id))
            .bind(&module.summary)
            .bind(&module.content)
            .execute(&mut *tx)
            .await?;
        }

        for exercise in &seed.exercises {
            sqlx::query(
                r#"
                INSERT INTO exercises (module_id, type, prompt, answer)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(exercise.module_id)
            .bind(&exercise.kind)
            .bind(&exercise.prompt)
            .bind(&exercise.answer)
            .execute(&mut *tx)
            .await?;
        }

        for card in &seed.flashcards {
            sqlx::query(
                r#"
                INSERT INTO flashcards (module_id, front, back)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(card.module_id)
            .bind(&card.front)
            .bind(&card.back)
            .execute(&mut *tx)
            .await?;
        }

        for mindmap in &seed.mindmaps {
            sqlx::query(
                r#"
                INSERT INTO mindmaps (module_id, title, content)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(mindmap.module_id)
            .bind(&mindmap.title)
            .bind(&mindmap.content)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(SeedCounts {
            modules: seed.modules.len(),
            exercises: seed.exercises.len(),
            flashcards: seed.flashcards.len(),
            mindmaps: seed.mindmaps.len(),
        })
    }

    // === Flashcard Repository ===

    /// All flashcards, optionally for one module
    pub async fn list_flashcards(&self, module_id: Option<i64>) -> Result<Vec<DbFlashcard>> {
        let cards = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, module_id, front, back, ease_factor, interval, repetitions, next_review
            FROM flashcards
            WHERE ?1 IS NULL OR module_id = ?1
            ORDER BY id
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Get flashcard by ID
    pub async fn get_flashcard(&self, card_id: i64) -> Result<Option<DbFlashcard>> {
        let card = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, module_id, front, back, ease_factor, interval, repetitions, next_review
            FROM flashcards
            WHERE id = ?
            "#,
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Cards never scheduled or scheduled on or before `today`
    pub async fn get_due_flashcards(
        &self,
        today: NaiveDate,
        module_id: Option<i64>,
    ) -> Result<Vec<DbFlashcard>> {
        let cards = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, module_id, front, back, ease_factor, interval, repetitions, next_review
            FROM flashcards
            WHERE (next_review IS NULL OR next_review <= ?1)
              AND (?2 IS NULL OR module_id = ?2)
            ORDER BY next_review IS NOT NULL, next_review, id
            "#,
        )
        .bind(today)
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Persist a scheduler result. Last write wins.
    pub async fn update_review_state(&self, card_id: i64, state: &ReviewState) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE flashcards
            SET ease_factor = ?, interval = ?, repetitions = ?, next_review = ?
            WHERE id = ?
            "#,
        )
        .bind(state.ease_factor)
        .bind(i64::from(state.interval))
        .bind(i64::from(state.repetitions))
        .bind(state.next_review)
        .bind(card_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Daily Activity Repository ===

    /// Activities of a day in display order
    pub async fn get_day_activities(&self, day_number: u32) -> Result<Vec<DbDailyActivity>> {
        let activities = sqlx::query_as::<_, DbDailyActivity>(
            r#"
            SELECT id, day_number, position, activity_type, activity_id, title, description,
                   completed, completed_at
            FROM daily_activities
            WHERE day_number = ?
            ORDER BY position, id
            "#,
        )
        .bind(i64::from(day_number))
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    pub async fn count_day_activities(&self, day_number: u32) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM daily_activities WHERE day_number = ?")
                .bind(i64::from(day_number))
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Swap a day's rows for a freshly generated set
    pub async fn replace_day_activities(
        &self,
        day_number: u32,
        activities: &[PlannedActivity],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::replace_day_in(&mut tx, day_number, activities).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Save new settings together with a freshly generated day
    pub async fn save_settings_with_day(
        &self,
        settings: &PlanSettings,
        day_number: u32,
        activities: &[PlannedActivity],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::save_settings_in(&mut tx, settings).await?;
        Self::replace_day_in(&mut tx, day_number, activities).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Save new settings, replace every day of the plan and drop rows past its end
    pub async fn replace_plan(
        &self,
        settings: &PlanSettings,
        days: &[(u32, Vec<PlannedActivity>)],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::save_settings_in(&mut tx, settings).await?;

        sqlx::query("DELETE FROM daily_activities WHERE day_number > ?")
            .bind(i64::from(settings.plan_duration))
            .execute(&mut *tx)
            .await?;

        for (day_number, activities) in days {
            Self::replace_day_in(&mut tx, *day_number, activities).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn replace_day_in(
        tx: &mut Transaction<'_, Sqlite>,
        day_number: u32,
        activities: &[PlannedActivity],
    ) -> Result<()> {
        sqlx::query("DELETE FROM daily_activities WHERE day_number = ?")
            .bind(i64::from(day_number))
            .execute(&mut **tx)
            .await?;

        for (position, activity) in activities.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO daily_activities (day_number, position, activity_type, activity_id,
                                              title, description, completed, completed_at)
                VALUES (?, ?, ?, ?, ?, ?, 0, NULL)
                "#,
            )
            .bind(i64::from(day_number))
            .bind(position as i64)
            .bind(activity.activity_type.as_str())
            .bind(activity.activity_id)
            .bind(&activity.title)
            .bind(&activity.description)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Get activity by ID
    pub async fn get_activity(&self, activity_id: i64) -> Result<Option<DbDailyActivity>> {
        let activity = sqlx::query_as::<_, DbDailyActivity>(
            r#"
            SELECT id, day_number, position, activity_type, activity_id, title, description,
                   completed, completed_at
            FROM daily_activities
            WHERE id = ?
            "#,
        )
        .bind(activity_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(activity)
    }

    /// Flip the completed flag of one activity
    pub async fn toggle_activity(
        &self,
        activity_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<DbDailyActivity>> {
        let result = sqlx::query(
            r#"
            UPDATE daily_activities
            SET completed = NOT completed,
                completed_at = CASE WHEN completed THEN NULL ELSE ? END
            WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(activity_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_activity(activity_id).await
    }

    /// Mark the first open activity of a day matching type and item as done
    pub async fn complete_matching_activity(
        &self,
        day_number: u32,
        activity_type: ActivityType,
        activity_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE daily_activities
            SET completed = 1, completed_at = ?1
            WHERE id = (
                SELECT id FROM daily_activities
                WHERE day_number = ?2
                  AND activity_type = ?3
                  AND (?4 IS NULL OR activity_id = ?4)
                  AND completed = 0
                ORDER BY position
                LIMIT 1
            )
            "#,
        )
        .bind(now)
        .bind(i64::from(day_number))
        .bind(activity_type.as_str())
        .bind(activity_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Settings Repository ===

    /// Get the plan settings singleton
    pub async fn get_plan_settings(&self) -> Result<PlanSettings> {
        let row = sqlx::query_as::<_, DbPlanSettings>(
            r#"
            SELECT plan_duration, current_day, start_date
            FROM plan_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::Internal("plan settings row is missing".to_string()))?;

        Ok(row.to_core()?)
    }

    async fn save_settings_in(
        tx: &mut Transaction<'_, Sqlite>,
        settings: &PlanSettings,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO plan_settings (id, plan_duration, current_day, start_date)
            VALUES (1, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                plan_duration = excluded.plan_duration,
                current_day = excluded.current_day,
                start_date = excluded.start_date
            "#,
        )
        .bind(i64::from(settings.plan_duration))
        .bind(i64::from(settings.current_day))
        .bind(settings.start_date)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    // === Progress Repository ===

    /// Get progress for one item
    pub async fn get_progress(&self, item_type: &str, item_id: i64) -> Result<Option<DbProgress>> {
        let progress = sqlx::query_as::<_, DbProgress>(
            r#"
            SELECT item_type, item_id, status, score, completed_at, last_seen
            FROM progress
            WHERE item_type = ? AND item_id = ?
            "#,
        )
        .bind(item_type)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(progress)
    }

    /// Insert or overwrite the status of one item
    pub async fn upsert_progress(
        &self,
        item_type: &str,
        item_id: i64,
        status: ProgressStatus,
        score: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<DbProgress> {
        let completed_at = (status == ProgressStatus::Completed).then_some(now);

        sqlx::query(
            r#"
            INSERT INTO progress (item_type, item_id, status, score, completed_at, last_seen)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (item_type, item_id) DO UPDATE SET
                status = excluded.status,
                score = COALESCE(excluded.score, progress.score),
                completed_at = CASE
                    WHEN excluded.status = 'completed'
                        THEN COALESCE(progress.completed_at, excluded.completed_at)
                    ELSE NULL
                END,
                last_seen = excluded.last_seen
            "#,
        )
        .bind(item_type)
        .bind(item_id)
        .bind(status.as_str())
        .bind(score)
        .bind(completed_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_progress(item_type, item_id)
            .await?
            .ok_or_else(|| ApiError::Internal("progress row vanished after upsert".to_string()))
    }

    /// Record a view: attempted unless already completed
    pub async fn touch_progress(
        &self,
        item_type: &str,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO progress (item_type, item_id, status, last_seen)
            VALUES (?1, ?2, 'attempted', ?3)
            ON CONFLICT (item_type, item_id) DO UPDATE SET
                status = CASE WHEN progress.status = 'completed' THEN 'completed' ELSE 'attempted' END,
                last_seen = excluded.last_seen
            "#,
        )
        .bind(item_type)
        .bind(item_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Count progress records by item type and status
    pub async fn progress_summary(&self) -> Result<Vec<ProgressCount>> {
        let counts = sqlx::query_as::<_, ProgressCount>(
            r#"
            SELECT item_type, status, COUNT(*) AS count
            FROM progress
            GROUP BY item_type, status
            ORDER BY item_type, status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
