//! Test fixtures and factory functions for creating test data.

use serde_json::json;

use study_tracker_backend::models::{
    SeedCatalog, SeedExercise, SeedFlashcard, SeedMindmap, SeedModule,
};

/// Sample catalog with `num_modules` modules.
///
/// Module `i` (1-based) gets two exercises, three flashcards and one mind
/// map, except the last module which has no mind map.
pub fn sample_catalog(num_modules: i64) -> SeedCatalog {
    let modules = (1..=num_modules)
        .map(|i| SeedModule {
            title: format!("Module {i}"),
            slug: format!("module-{i}"),
            category: if i % 2 == 0 { "networking" } else { "linux" }.to_string(),
            order_index: None,
            summary: format!("Summary of module {i}"),
            content: format!("Content of module {i}"),
        })
        .collect();

    let exercises = (1..=num_modules)
        .flat_map(|i| {
            (1..=2).map(move |n| SeedExercise {
                module_id: Some(i),
                kind: "practice".to_string(),
                prompt: format!("Exercise {n} for module {i}"),
                answer: None,
            })
        })
        .collect();

    let flashcards = (1..=num_modules)
        .flat_map(|i| {
            (1..=3).map(move |n| SeedFlashcard {
                module_id: Some(i),
                front: format!("Question {n} of module {i}?"),
                back: format!("Answer {n}."),
            })
        })
        .collect();

    let mindmaps = (1..num_modules)
        .map(|i| SeedMindmap {
            module_id: Some(i),
            title: format!("Map of module {i}"),
            content: String::new(),
        })
        .collect();

    SeedCatalog {
        modules,
        exercises,
        flashcards,
        mindmaps,
    }
}

/// Create a review request body.
pub fn review_request(quality: i64) -> serde_json::Value {
    json!({ "quality": quality })
}

/// Create a plan settings update body.
pub fn plan_settings_request(
    plan_duration: Option<i64>,
    current_day: Option<i64>,
) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    if let Some(d) = plan_duration {
        obj.insert("plan_duration".to_string(), json!(d));
    }
    if let Some(d) = current_day {
        obj.insert("current_day".to_string(), json!(d));
    }
    serde_json::Value::Object(obj)
}

/// Create a progress update body.
pub fn progress_request(item_type: &str, item_id: i64, status: &str) -> serde_json::Value {
    json!({
        "item_type": item_type,
        "item_id": item_id,
        "status": status,
    })
}
