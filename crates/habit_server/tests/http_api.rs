use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use habit_core::db::{open_db, open_db_in_memory};
use habit_core::FixedClock;
use habit_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

// 2026-10-14 is a Wednesday (week day 3).
const TODAY: &str = "2026-10-14";

fn app() -> Router {
    let today = NaiveDate::from_ymd_opt(2026, 10, 14).expect("date should be a valid calendar day");
    build_router(
        AppState::new(open_db_in_memory().expect("in-memory database should open"), FixedClock(today)),
        true,
    )
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request should build"))
        .await
        .expect("router should answer");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("response body should be readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, value)
}

async fn create_read_habit(app: &Router) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/habits",
        Some(json!({ "title": "Read", "weekDays": [1, 3, 5] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, day) = send(app, Method::GET, &format!("/day?date={TODAY}"), None).await;
    day["availableHabits"][0]["id"].as_str().expect("field should be a string").to_string()
}

#[tokio::test]
async fn healthz_reports_version() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(!body["version"].as_str().expect("field should be a string").is_empty());
}

#[tokio::test]
async fn create_query_toggle_walkthrough() {
    let app = app();
    let id = create_read_habit(&app).await;

    let (status, day) = send(&app, Method::GET, &format!("/day?date={TODAY}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["availableHabits"][0]["title"], "Read");
    assert_eq!(day["availableHabits"][0]["created_at"], TODAY);
    assert_eq!(day["completedHabits"], json!([]));

    let toggle_uri = format!("/habits/{id}/toggle");
    let (status, body) = send(&app, Method::PATCH, &toggle_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, day) = send(&app, Method::GET, &format!("/day?date={TODAY}"), None).await;
    assert_eq!(day["completedHabits"], json!([id]));

    send(&app, Method::PATCH, &toggle_uri, None).await;
    let (_, day) = send(&app, Method::GET, &format!("/day?date={TODAY}"), None).await;
    assert_eq!(day["completedHabits"], json!([]));
}

#[tokio::test]
async fn habit_is_not_available_before_creation_or_on_other_weekdays() {
    let app = app();
    create_read_habit(&app).await;

    let (_, last_week) = send(&app, Method::GET, "/day?date=2026-10-07", None).await;
    assert_eq!(last_week["availableHabits"], json!([]));

    let (_, thursday) = send(&app, Method::GET, "/day?date=2026-10-15", None).await;
    assert_eq!(thursday["availableHabits"], json!([]));

    let (_, friday) = send(&app, Method::GET, "/day?date=2026-10-16T08:00:00Z", None).await;
    assert_eq!(friday["availableHabits"][0]["title"], "Read");
}

#[tokio::test]
async fn far_future_dates_keep_calendar_order_or_are_rejected() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/habits",
        Some(json!({ "title": "Read", "weekDays": [0, 1, 2, 3, 4, 5, 6] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, last_day) = send(&app, Method::GET, "/day?date=9999-12-31", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(last_day["availableHabits"][0]["title"], "Read");

    // "+10000-01-01" would sort before "2026-10-14" as text.
    let (status, body) = send(&app, Method::GET, "/day?date=%2B10000-01-01", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_failed");

    let (status, body) = send(&app, Method::GET, "/day?date=0000-06-01", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_failed");
}

#[tokio::test]
async fn summary_lists_only_toggled_days() {
    let app = app();
    let id = create_read_habit(&app).await;

    let (status, summary) = send(&app, Method::GET, "/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary, json!([]));

    send(&app, Method::PATCH, &format!("/habits/{id}/toggle"), None).await;
    let (_, summary) = send(&app, Method::GET, "/summary", None).await;
    let rows = summary.as_array().expect("summary should be an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["date"], TODAY);
    assert_eq!(rows[0]["completed"], 1);
    assert_eq!(rows[0]["available"], 1);
    assert!(rows[0]["id"].is_string());
}

#[tokio::test]
async fn invalid_payloads_are_rejected_with_client_errors() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/habits",
        Some(json!({ "title": "Read", "weekDays": [7] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_failed");

    let (status, body) = send(&app, Method::POST, "/habits", Some(json!({ "title": "Read" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");

    let (status, body) = send(&app, Method::GET, "/day", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");

    let (status, body) = send(&app, Method::GET, "/day?date=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_failed");

    let (status, body) = send(&app, Method::PATCH, "/habits/not-a-uuid/toggle", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_failed");

    let (_, summary) = send(&app, Method::GET, "/summary", None).await;
    assert_eq!(summary, json!([]));
}

#[tokio::test]
async fn toggling_unknown_habit_is_not_found() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/habits/6f1c2a8e-3c7b-4c55-9a53-1f0e2b7d9c11/toggle",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "habit_not_found");
}

#[tokio::test]
async fn unknown_route_returns_json_not_found() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/habits/everything", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "route_not_found");
}

#[tokio::test]
async fn data_survives_reopening_a_file_database() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("habits.sqlite3");
    let today = NaiveDate::from_ymd_opt(2026, 10, 14).expect("date should be a valid calendar day");

    {
        let app = build_router(AppState::new(open_db(&path).expect("database file should open"), FixedClock(today)), false);
        create_read_habit(&app).await;
    }

    let app = build_router(AppState::new(open_db(&path).expect("database file should open"), FixedClock(today)), false);
    let (_, day) = send(&app, Method::GET, &format!("/day?date={TODAY}"), None).await;
    assert_eq!(day["availableHabits"][0]["title"], "Read");
}
