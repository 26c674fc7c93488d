pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use study_core::algorithm::{sm2::Sm2, ReviewScheduler};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub scheduler: Arc<dyn ReviewScheduler>,
}

impl AppState {
    /// State with the default SM-2 scheduler
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(db),
            scheduler: Arc::new(Sm2::default()),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Catalog routes
        .route("/api/modules", get(routes::catalog::list))
        .route("/api/modules/:slug", get(routes::catalog::module_detail))
        .route("/api/mindmaps/:id", get(routes::catalog::mindmap_detail))
        .route("/api/catalog/coverage", get(routes::catalog::coverage))
        // Plan routes
        .route("/api/plan", get(routes::plan::overview))
        .route("/api/plan/settings", put(routes::plan::update_settings))
        .route("/api/plan/advance", post(routes::plan::advance))
        .route("/api/plan/days/:day", get(routes::plan::day))
        .route(
            "/api/plan/activities/:id/toggle",
            post(routes::plan::toggle_activity),
        )
        // Flashcard routes
        .route("/api/flashcards/due", get(routes::flashcards::due))
        .route("/api/flashcards/:id/review", post(routes::flashcards::review))
        // Progress routes
        .route("/api/progress", post(routes::progress::record))
        .route("/api/progress/summary", get(routes::progress::summary))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Opening database...");
    let db = Database::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    if let Some(seed_dir) = &config.seed_dir {
        services::seed::seed_if_empty(&db, seed_dir).await?;
    }

    let state = AppState::new(db);
    let db = state.db.clone();

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down, closing database");
    db.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn health_check() -> &'static str {
    "OK"
}
