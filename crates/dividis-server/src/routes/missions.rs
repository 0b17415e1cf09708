//! Mission Routes - Available missions, global missions and transitions

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use super::{error_response, ApiError};
use crate::auth::CurrentUser;
use crate::models::{GlobalMissionResponse, MissionProgressResponse, MissionResponse};
use crate::AppState;

/// Missions of the modules the caller has unlocked
#[utoipa::path(
    get,
    path = "/api/missions",
    params(("X-User-Id" = String, Header, description = "Acting user (UUID)")),
    responses(
        (status = 200, description = "Available missions", body = Vec<MissionResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Missions"
)]
pub async fn list_available_missions(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<MissionResponse>>, ApiError> {
    let missions = state
        .progress
        .available_missions(user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(missions.into_iter().map(Into::into).collect()))
}

/// Global missions with their daily/weekly progress
#[utoipa::path(
    get,
    path = "/api/missions/global",
    params(("X-User-Id" = String, Header, description = "Acting user (UUID)")),
    responses(
        (status = 200, description = "Global mission status", body = Vec<GlobalMissionResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Missions"
)]
pub async fn list_global_missions(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<GlobalMissionResponse>>, ApiError> {
    let statuses = state
        .progress
        .global_missions(user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(statuses.into_iter().map(Into::into).collect()))
}

/// Complete a mission and collect its reward
#[utoipa::path(
    post,
    path = "/api/missions/{id}/complete",
    params(
        ("id" = String, Path, description = "Mission ID"),
        ("X-User-Id" = String, Header, description = "Acting user (UUID)")
    ),
    responses(
        (status = 200, description = "Mission completed", body = MissionProgressResponse),
        (status = 400, description = "Malformed mission ID"),
        (status = 403, description = "Mission module is locked"),
        (status = 404, description = "Mission not found"),
        (status = 409, description = "Mission already failed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Missions"
)]
pub async fn complete_mission(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(mission_id): Path<String>,
) -> Result<Json<MissionProgressResponse>, ApiError> {
    let progress = state
        .progress
        .complete_mission(user_id, &mission_id)
        .await
        .map_err(error_response)?;

    Ok(Json(progress.into()))
}

/// Mark a mission as failed
#[utoipa::path(
    post,
    path = "/api/missions/{id}/fail",
    params(
        ("id" = String, Path, description = "Mission ID"),
        ("X-User-Id" = String, Header, description = "Acting user (UUID)")
    ),
    responses(
        (status = 200, description = "Mission failed", body = MissionProgressResponse),
        (status = 400, description = "Malformed mission ID"),
        (status = 403, description = "Mission module is locked"),
        (status = 404, description = "Mission not found"),
        (status = 409, description = "Mission already completed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Missions"
)]
pub async fn fail_mission(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(mission_id): Path<String>,
) -> Result<Json<MissionProgressResponse>, ApiError> {
    let progress = state
        .progress
        .fail_mission(user_id, &mission_id)
        .await
        .map_err(error_response)?;

    Ok(Json(progress.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/missions", get(list_available_missions))
        .route("/api/missions/global", get(list_global_missions))
        .route("/api/missions/:id/complete", post(complete_mission))
        .route("/api/missions/:id/fail", post(fail_mission))
}
