//! Direct profile handlers.
//!
//! Unlike the memory write paths, every profile operation is synchronous:
//! the response carries the final outcome, no task is involved.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;

use mnemon_types::profile::{AddProfileRequest, Profile, UpdateProfileRequest};

use crate::http::error::AppError;
use crate::http::extractors::Json;
use crate::state::AppState;

/// POST /api/v1/users/:uid/profiles - Create an unconfirmed profile.
pub async fn add_profile(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(body): Json<AddProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = state
        .profiles
        .add(&uid, &body.content, body.session_id)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/users/:uid/profiles - All profiles for a user.
pub async fn list_profiles(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<Profile>>, AppError> {
    let profiles = state.profiles.list_all(&uid).await?;
    Ok(Json(profiles))
}

/// PUT /api/v1/users/:uid/profiles/:pid - Optimistic content update.
pub async fn update_profile(
    State(state): State<AppState>,
    Path((uid, pid)): Path<(String, String)>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let profile = state
        .profiles
        .update(&uid, &pid, &body.content_before, &body.content_after)
        .await?;
    Ok(Json(profile))
}

/// POST /api/v1/users/:uid/profiles/:pid/confirm - Mark a profile
/// confirmed. Idempotent.
pub async fn confirm_profile(
    State(state): State<AppState>,
    Path((uid, pid)): Path<(String, String)>,
) -> Result<Json<Profile>, AppError> {
    let profile = state.profiles.confirm(&uid, &pid).await?;
    Ok(Json(profile))
}

/// DELETE /api/v1/users/:uid/profiles/:pid - Delete one profile.
pub async fn delete_profile(
    State(state): State<AppState>,
    Path((uid, pid)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state.profiles.delete(&uid, &pid).await?;
    Ok(Json(json!({ "deleted": deleted, "pid": pid })))
}
