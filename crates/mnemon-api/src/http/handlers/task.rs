//! Task status and history handlers.
//!
//! All reads come straight from the in-memory registry; identifiers and
//! dates arrive as path/query strings and are parsed here so malformed
//! input gets the uniform error envelope instead of axum's default
//! rejection.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use mnemon_types::task::{TaskRecord, TaskStats};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

fn parse_submit_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation_field("submit_id", format!("invalid submit id: '{raw}'")))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation_field(field, format!("invalid date: '{raw}'")))
}

/// GET /api/v1/tasks/:submit_id - Status of one task.
pub async fn get_task(
    State(state): State<AppState>,
    Path(submit_id): Path<String>,
) -> Result<Json<TaskRecord>, AppError> {
    let submit_id = parse_submit_id(&submit_id)?;
    let record = state.tasks.get(submit_id)?;
    Ok(Json(record))
}

/// GET /api/v1/tasks - Every tracked task, keyed by submit id.
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Json<std::collections::HashMap<Uuid, TaskRecord>> {
    Json(state.tasks.all())
}

/// GET /api/v1/tasks/by-date/:date - Tasks created on one UTC date.
pub async fn tasks_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<TaskRecord>>, AppError> {
    let date = parse_date("date", &date)?;
    Ok(Json(state.tasks.by_date(date)))
}

/// GET /api/v1/tasks/range?start&end - Tasks created within a UTC date
/// range, inclusive on both ends.
pub async fn tasks_by_range(
    State(state): State<AppState>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<TaskRecord>>, AppError> {
    let start = parse_date("start", &params.start)?;
    let end = parse_date("end", &params.end)?;
    let records = state.tasks.by_date_range(start, end)?;
    Ok(Json(records))
}

/// GET /api/v1/tasks/stats - Aggregate counts over the registry.
pub async fn task_stats(State(state): State<AppState>) -> Json<TaskStats> {
    Json(state.tasks.stats())
}
