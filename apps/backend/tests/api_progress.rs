//! Progress API tests.

mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::{activities, fixtures, TestContext};

fn exercise_activity(day: &Value, exercise_id: i64) -> Option<Value> {
    activities(day)
        .into_iter()
        .find(|a| a["activity_type"] == "exercise" && a["activity_id"] == exercise_id)
}

/// Test completing an exercise completes its activity on the current day.
#[tokio::test]
async fn test_completed_exercise_marks_activity() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    server.get("/api/plan/days/1").await.assert_status_ok();

    let response = server
        .post("/api/progress")
        .json(&fixtures::progress_request("exercise", 2, "completed"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["activity_completed"], true);
    assert_eq!(body["progress"]["status"], "completed");
    assert!(body["progress"]["completed_at"].is_string());

    let day: Value = server.get("/api/plan/days/1").await.json();
    assert_eq!(exercise_activity(&day, 2).unwrap()["completed"], true);
    assert_eq!(exercise_activity(&day, 1).unwrap()["completed"], false);
}

/// Test an attempt does not complete the activity.
#[tokio::test]
async fn test_attempt_leaves_activity_open() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    server.get("/api/plan/days/1").await.assert_status_ok();

    let response = server
        .post("/api/progress")
        .json(&fixtures::progress_request("exercise", 1, "attempted"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["activity_completed"], false);
    assert!(body["progress"]["completed_at"].is_null());

    let day: Value = server.get("/api/plan/days/1").await.json();
    assert_eq!(exercise_activity(&day, 1).unwrap()["completed"], false);
}

/// Test completing an item that is not on today's list changes no activity.
#[tokio::test]
async fn test_completion_outside_today_is_only_recorded() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    server.get("/api/plan/days/1").await.assert_status_ok();

    let response = server
        .post("/api/progress")
        .json(&fixtures::progress_request("exercise", 11, "completed"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["activity_completed"], false);

    let stored = ctx.db.get_progress("exercise", 11).await.unwrap().unwrap();
    assert_eq!(stored.status, "completed");
}

/// Test progress is unique per item and keeps its first completion time.
#[tokio::test]
async fn test_progress_upsert_is_per_item() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let first: Value = server
        .post("/api/progress")
        .json(&fixtures::progress_request("exercise", 5, "completed"))
        .await
        .json();
    let second: Value = server
        .post("/api/progress")
        .json(&fixtures::progress_request("exercise", 5, "completed"))
        .await
        .json();

    assert_eq!(
        first["progress"]["completed_at"],
        second["progress"]["completed_at"]
    );

    let summary: Value = server.get("/api/progress/summary").await.json();
    let items = summary["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["item_type"], "exercise");
    assert_eq!(items[0]["status"], "completed");
    assert_eq!(items[0]["count"], 1);
}

/// Test the summary groups by item type and status.
#[tokio::test]
async fn test_progress_summary_groups() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    for (item_type, item_id, status) in [
        ("exercise", 1, "completed"),
        ("exercise", 2, "completed"),
        ("exercise", 3, "attempted"),
        ("module", 1, "completed"),
    ] {
        server
            .post("/api/progress")
            .json(&fixtures::progress_request(item_type, item_id, status))
            .await
            .assert_status_ok();
    }

    let summary: Value = server.get("/api/progress/summary").await.json();
    let items = summary["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["item_type"], "exercise");
    assert_eq!(items[0]["status"], "attempted");
    assert_eq!(items[0]["count"], 1);
    assert_eq!(items[1]["status"], "completed");
    assert_eq!(items[1]["count"], 2);
    assert_eq!(items[2]["item_type"], "module");
}

/// Test an empty item type is rejected.
#[tokio::test]
async fn test_empty_item_type_rejected() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server
        .post("/api/progress")
        .json(&fixtures::progress_request(" ", 1, "completed"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test an unknown status fails body validation.
#[tokio::test]
async fn test_unknown_status_rejected() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server
        .post("/api/progress")
        .json(&fixtures::progress_request("exercise", 1, "finished"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
