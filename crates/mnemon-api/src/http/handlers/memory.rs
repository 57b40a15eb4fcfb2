//! Memory write submission and synchronous read handlers.
//!
//! Writes (ingest, clear, record-action) are accepted with `202` and a
//! `submit_id`; the actual engine work runs on the task runner and its
//! outcome is retrievable through the task endpoints. Reads (search,
//! show-all) hit the engine inline.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use mnemon_core::action;
use mnemon_types::action::ActionRecord;
use mnemon_types::memory::MemoryMessage;

use crate::http::error::AppError;
use crate::http::extractors::Json;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub uid: String,
    pub messages: Vec<MemoryMessage>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub uid: String,
    pub query: String,
    pub limit: Option<usize>,
}

fn accepted(submit_id: Uuid) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::ACCEPTED, Json(json!({ "submit_id": submit_id })))
}

/// POST /api/v1/memories - Submit conversational content for ingestion.
pub async fn submit_ingest(
    State(state): State<AppState>,
    Json(body): Json<IngestRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    // Cheap shape checks up front so the caller gets a 400 instead of a
    // failed task; the service re-validates when the work runs.
    if body.uid.trim().is_empty() {
        return Err(AppError::validation_field("uid", "uid must not be empty"));
    }
    if body.messages.is_empty() {
        return Err(AppError::validation_field(
            "messages",
            "messages must not be empty",
        ));
    }

    let memory = Arc::clone(&state.memory);
    let submit_id = state.runner.submit(async move {
        let entry_id = memory
            .ingest(&body.uid, &body.messages, body.session_id.as_deref())
            .await?;
        Ok::<_, mnemon_types::error::MemoryServiceError>(json!({ "entry_id": entry_id }))
    });

    Ok(accepted(submit_id))
}

/// DELETE /api/v1/memories/:uid - Submit a wipe of all memories for a user.
pub async fn submit_clear(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let memory = Arc::clone(&state.memory);
    let submit_id = state.runner.submit(async move {
        let deleted = memory.clear(&uid).await?;
        Ok::<_, mnemon_types::error::MemoryServiceError>(json!({ "deleted": deleted }))
    });

    Ok(accepted(submit_id))
}

/// POST /api/v1/actions - Submit an action record for dispatch.
pub async fn submit_action(
    State(state): State<AppState>,
    Json(record): Json<ActionRecord>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if record.uid.trim().is_empty() {
        return Err(AppError::validation_field("uid", "uid must not be empty"));
    }
    // Dispatch is pure; run it here so an unknown tag is a synchronous 400
    // rather than a background failure.
    action::dispatch(&record)?;

    let memory = Arc::clone(&state.memory);
    let submit_id = state.runner.submit(async move {
        let receipt = memory.record_action(&record).await?;
        Ok::<_, mnemon_core::service::memory::RecordActionError>(json!({
            "namespace": receipt.namespace,
            "entry_id": receipt.entry_id,
        }))
    });

    Ok(accepted(submit_id))
}

/// GET /api/v1/memories/search - Scored profiling results for a query.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let limit = params
        .limit
        .unwrap_or(state.config.memory.default_search_limit);
    let results = state
        .memory
        .retrieve(&params.uid, &params.query, limit)
        .await?;
    Ok(Json(json!({ "results": results })))
}

/// GET /api/v1/memories/:uid - Every profiling entry for a user.
pub async fn show_all(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let results = state.memory.show_all(&uid).await?;
    Ok(Json(json!({ "results": results })))
}
