//! Route handlers and request payloads.
//!
//! # Responsibility
//! - Decode JSON bodies, query strings, and path ids into typed input.
//! - Hand each request to the habit service on the blocking pool.
//!
//! # Invariants
//! - Malformed input is rejected with a 400 before the store is touched.
//! - Create and toggle act on the server's current day, never a client date.

use crate::http::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate};
use habit_core::{core_version, DaySummary, DayView};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateHabitBody {
    pub title: String,
    #[serde(rename = "weekDays")]
    pub week_days: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn healthz_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}

pub async fn create_habit_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateHabitBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::invalid_request(rejection.body_text()))?;
    state
        .run("create_habit", move |service| {
            service.create_habit(&body.title, &body.week_days)
        })
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn day_handler(
    State(state): State<AppState>,
    query: Result<Query<DayQuery>, QueryRejection>,
) -> Result<Json<DayView>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::invalid_request(rejection.body_text()))?;
    let date = parse_day_param(&query.date)?;
    let view = state
        .run("day_view", move |service| service.day_view(date))
        .await?;
    Ok(Json(view))
}

pub async fn toggle_habit_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let habit_id = Uuid::parse_str(id.trim())
        .map_err(|_| ApiError::validation(format!("`{id}` is not a valid habit id")))?;
    state
        .run("toggle_habit", move |service| service.toggle_today(habit_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<DaySummary>>, ApiError> {
    let summary = state.run("summary", |service| service.summary()).await?;
    Ok(Json(summary))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; the latter keeps the
/// calendar date of its own offset.
pub fn parse_day_param(raw: &str) -> Result<NaiveDate, ApiError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| {
            ApiError::validation(format!(
                "`{trimmed}` is not a date; expected YYYY-MM-DD or an RFC 3339 timestamp"
            ))
        })
}

/// Fallback body for unknown routes.
pub async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "code": "route_not_found",
                "message": "no such route",
            }
        })),
    )
}
