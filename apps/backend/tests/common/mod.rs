//! Common test utilities and fixtures for integration tests.
//!
//! Every TestContext owns a private in-memory SQLite store with migrations
//! applied and a sample catalog seeded, so tests need no external services.

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::Value;

use study_tracker_backend::db::Database;
use study_tracker_backend::models::SeedCatalog;
use study_tracker_backend::{build_router, AppState};

/// Test context containing the database handle and router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Context seeded with the default sample catalog.
    pub async fn new() -> Self {
        Self::with_catalog(fixtures::sample_catalog(6)).await
    }

    /// Context seeded with the given catalog.
    ///
    /// # Panics
    /// Panics if the in-memory database cannot be opened or seeded.
    pub async fn with_catalog(seed: SeedCatalog) -> Self {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        db.seed_catalog(&seed)
            .await
            .expect("Failed to seed catalog");

        let state = AppState::new(db);
        let db = state.db.clone();
        let app = build_router(state);

        Self { db, app }
    }

    /// Get the router.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Test server over the router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }
}

/// Activities array of a day response.
pub fn activities(body: &Value) -> Vec<Value> {
    body["activities"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

/// Activity types of a day response, in order.
pub fn activity_types(body: &Value) -> Vec<String> {
    activities(body)
        .iter()
        .map(|a| a["activity_type"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// First activity of the given type in a day response.
pub fn find_activity(body: &Value, activity_type: &str) -> Option<Value> {
    activities(body)
        .into_iter()
        .find(|a| a["activity_type"] == activity_type)
}
