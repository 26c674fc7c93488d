//! Plan and daily activity API tests.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use common::{activities, activity_types, fixtures, TestContext};
use study_core::MAX_PLAN_DURATION;
use study_tracker_backend::models::SeedCatalog;
use study_tracker_backend::services::today;

/// Test the first access to a day generates its activities.
#[tokio::test]
async fn test_day_is_generated_on_first_access() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    assert_eq!(ctx.db.count_day_activities(1).await.unwrap(), 0);

    let response = server.get("/api/plan/days/1").await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["day_number"], 1);
    assert_eq!(body["complete"], false);
    assert_eq!(
        activity_types(&body),
        vec![
            "module",
            "exercise",
            "exercise",
            "exercise",
            "exercise",
            "mindmap",
            "flashcards",
            "lab",
            "reflection",
        ]
    );

    let items = activities(&body);
    assert_eq!(items[0]["activity_id"], 1);
    assert_eq!(items[0]["title"], "Study: Module 1");
    let exercise_ids: Vec<i64> = items[1..5]
        .iter()
        .map(|a| a["activity_id"].as_i64().unwrap())
        .collect();
    assert_eq!(exercise_ids, vec![1, 2, 3, 4]);
    assert_eq!(items[7]["title"], "Lab: linux");
    assert!(items[8]["activity_id"].is_null());
}

/// Test a generated day is served as stored on later reads.
#[tokio::test]
async fn test_day_is_not_regenerated_on_read() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let first: Value = server.get("/api/plan/days/2").await.json();
    let second: Value = server.get("/api/plan/days/2").await.json();

    let ids = |body: &Value| -> Vec<i64> {
        activities(body)
            .iter()
            .map(|a| a["id"].as_i64().unwrap())
            .collect()
    };
    assert_eq!(ids(&first), ids(&second));
}

/// Test toggling every activity completes the day.
#[tokio::test]
async fn test_toggle_completes_day() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let body: Value = server.get("/api/plan/days/1").await.json();
    let ids: Vec<i64> = activities(&body)
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();

    for id in &ids {
        let response = server
            .post(&format!("/api/plan/activities/{id}/toggle"))
            .await;
        response.assert_status_ok();
        let activity: Value = response.json();
        assert_eq!(activity["completed"], true);
        assert!(activity["completed_at"].is_string());
    }

    let body: Value = server.get("/api/plan/days/1").await.json();
    assert_eq!(body["complete"], true);

    // Toggling one back reopens the day
    let response = server
        .post(&format!("/api/plan/activities/{}/toggle", ids[0]))
        .await;
    let activity: Value = response.json();
    assert_eq!(activity["completed"], false);
    assert!(activity["completed_at"].is_null());

    let body: Value = server.get("/api/plan/days/1").await.json();
    assert_eq!(body["complete"], false);
}

/// Test toggling an unknown activity returns not found.
#[tokio::test]
async fn test_toggle_unknown_activity() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server.post("/api/plan/activities/9999/toggle").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

/// Test days outside the plan are rejected.
#[tokio::test]
async fn test_day_out_of_range() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server.get("/api/plan/days/0").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_input");

    let response = server.get("/api/plan/days/31").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test the overview reports settings and today's progress.
#[tokio::test]
async fn test_plan_overview() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server.get("/api/plan").await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["settings"]["plan_duration"], 30);
    assert_eq!(body["settings"]["current_day"], 1);
    assert_eq!(body["today"]["day_number"], 1);
    assert_eq!(body["today"]["total"], 9);
    assert_eq!(body["today"]["completed"], 0);
    assert_eq!(body["today"]["complete"], false);
    assert_eq!(body["standard_durations"], serde_json::json!([30, 60, 90, 180]));
}

/// Test changing the duration regenerates every day of the new plan.
#[tokio::test]
async fn test_duration_change_regenerates_plan() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server
        .put("/api/plan/settings")
        .json(&fixtures::plan_settings_request(Some(60), None))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["plan_duration"], 60);

    assert!(ctx.db.count_day_activities(1).await.unwrap() > 0);
    assert!(ctx.db.count_day_activities(60).await.unwrap() > 0);
    assert_eq!(ctx.db.count_day_activities(61).await.unwrap(), 0);

    // 60-day plans aim for three exercises a day
    let day: Value = server.get("/api/plan/days/1").await.json();
    let exercises = activity_types(&day)
        .iter()
        .filter(|t| *t == "exercise")
        .count();
    assert_eq!(exercises, 3);

    // Shrinking drops the days past the new end
    server
        .put("/api/plan/settings")
        .json(&fixtures::plan_settings_request(Some(30), None))
        .await
        .assert_status_ok();
    assert_eq!(ctx.db.count_day_activities(45).await.unwrap(), 0);
    assert!(ctx.db.count_day_activities(30).await.unwrap() > 0);
}

/// Test shrinking the plan pulls the current day back inside it.
#[tokio::test]
async fn test_shrinking_plan_clamps_current_day() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    server
        .put("/api/plan/settings")
        .json(&fixtures::plan_settings_request(Some(90), Some(75)))
        .await
        .assert_status_ok();

    let response = server
        .put("/api/plan/settings")
        .json(&fixtures::plan_settings_request(Some(60), None))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["current_day"], 60);
}

/// Test invalid settings are rejected and nothing is saved.
#[tokio::test]
async fn test_invalid_settings_rejected() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    for request in [
        fixtures::plan_settings_request(Some(0), None),
        fixtures::plan_settings_request(Some(-30), None),
        fixtures::plan_settings_request(None, Some(0)),
        fixtures::plan_settings_request(None, Some(31)),
    ] {
        let response = server.put("/api/plan/settings").json(&request).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    let body: Value = server.get("/api/plan").await.json();
    assert_eq!(body["settings"]["plan_duration"], 30);
    assert_eq!(body["settings"]["current_day"], 1);
}

/// Test oversized plan durations are rejected before anything is written.
#[tokio::test]
async fn test_oversized_duration_rejected() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    for duration in [i64::from(MAX_PLAN_DURATION) + 1, 4_000_000_000] {
        let response = server
            .put("/api/plan/settings")
            .json(&fixtures::plan_settings_request(Some(duration), None))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "invalid_input");
    }

    assert_eq!(ctx.db.count_day_activities(1).await.unwrap(), 0);
    let body: Value = server.get("/api/plan").await.json();
    assert_eq!(body["settings"]["plan_duration"], 30);

    let response = server.get("/api/plan/days/200000000").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test the default plan starts on the server's current date.
#[tokio::test]
async fn test_default_plan_starts_today() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let body: Value = server.get("/api/plan").await.json();

    assert_eq!(body["settings"]["start_date"], today().to_string());
    assert_eq!(body["today"]["date"], today().to_string());
}

/// Test moving the current day regenerates that day.
#[tokio::test]
async fn test_current_day_change_regenerates_day() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let body: Value = server.get("/api/plan/days/3").await.json();
    let first_id = activities(&body)[0]["id"].as_i64().unwrap();
    server
        .post(&format!("/api/plan/activities/{first_id}/toggle"))
        .await
        .assert_status_ok();

    server
        .put("/api/plan/settings")
        .json(&fixtures::plan_settings_request(None, Some(3)))
        .await
        .assert_status_ok();

    let body: Value = server.get("/api/plan/days/3").await.json();
    assert!(activities(&body).iter().all(|a| a["completed"] == false));
}

/// Test advancing moves to the next day and prepares it.
#[tokio::test]
async fn test_advance_day() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server.post("/api/plan/advance").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["advanced"], true);
    assert_eq!(body["settings"]["current_day"], 2);
    assert!(ctx.db.count_day_activities(2).await.unwrap() > 0);
}

/// Test advancing stops at the last day of the plan.
#[tokio::test]
async fn test_advance_halts_at_plan_end() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    server
        .put("/api/plan/settings")
        .json(&fixtures::plan_settings_request(Some(2), Some(2)))
        .await
        .assert_status_ok();

    let response = server.post("/api/plan/advance").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["advanced"], false);
    assert_eq!(body["settings"]["current_day"], 2);
}

/// Test an empty catalog still produces lab and reflection work.
#[tokio::test]
async fn test_empty_catalog_day() {
    let ctx = TestContext::with_catalog(SeedCatalog::default()).await;
    let server = ctx.server();

    let day1: Value = server.get("/api/plan/days/1").await.json();
    assert_eq!(activity_types(&day1), vec!["lab", "reflection"]);

    let day2: Value = server.get("/api/plan/days/2").await.json();
    assert_eq!(activity_types(&day2), vec!["flashcards", "lab", "reflection"]);
}
