//! Module and mind map endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use study_core::mindmap_coverage;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::progress;
use crate::AppState;

/// GET /api/modules
pub async fn list(State(state): State<AppState>) -> Result<Json<ModuleListResponse>> {
    let modules = state.db.list_modules().await?;
    Ok(Json(ModuleListResponse {
        modules: modules.iter().map(DbModule::to_core).collect(),
    }))
}

/// GET /api/modules/:slug
/// Opening a module counts as a view
pub async fn module_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ModuleDetailResponse>> {
    let module = state
        .db
        .get_module_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Module {slug} not found")))?;

    let exercises = state.db.list_exercises(Some(module.id)).await?;
    let mindmaps = state.db.list_mindmaps(Some(module.id)).await?;
    let flashcards = state.db.list_flashcards(Some(module.id)).await?;

    let activity_completed =
        progress::record_view(&state.db, "module", module.id, Utc::now()).await?;

    Ok(Json(ModuleDetailResponse {
        module: module.to_core(),
        summary: module.summary,
        content: module.content,
        exercises: exercises.iter().map(DbExercise::to_core).collect(),
        mindmaps: mindmaps.iter().map(DbMindmap::to_core).collect(),
        flashcard_count: flashcards.len(),
        activity_completed,
    }))
}

/// GET /api/mindmaps/:id
pub async fn mindmap_detail(
    State(state): State<AppState>,
    Path(mindmap_id): Path<i64>,
) -> Result<Json<MindmapDetailResponse>> {
    let mindmap = state
        .db
        .get_mindmap(mindmap_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Mind map {mindmap_id} not found")))?;

    let activity_completed =
        progress::record_view(&state.db, "mindmap", mindmap.id, Utc::now()).await?;

    Ok(Json(MindmapDetailResponse {
        mindmap: mindmap.to_core(),
        content: mindmap.content,
        activity_completed,
    }))
}

/// GET /api/catalog/coverage
/// Modules that no mind map covers
pub async fn coverage(State(state): State<AppState>) -> Result<Json<CoverageReport>> {
    let catalog = state.db.load_catalog().await?;
    Ok(Json(mindmap_coverage(&catalog)))
}
