//! Progress Routes - Profile, streaks and aggregated reads

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use super::{error_response, ApiError};
use crate::auth::CurrentUser;
use crate::models::{
    ModuleDetailResponse, ModuleProgressResponse, ProfileResponse, ProgressOverviewResponse,
    StreakResponse,
};
use crate::AppState;

/// Caller's XP and level
#[utoipa::path(
    get,
    path = "/api/profile",
    params(("X-User-Id" = String, Header, description = "Acting user (UUID)")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Progress"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state
        .progress
        .profile(user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(profile.into()))
}

/// Caller's streaks, one per module with activity
#[utoipa::path(
    get,
    path = "/api/streaks",
    params(("X-User-Id" = String, Header, description = "Acting user (UUID)")),
    responses(
        (status = 200, description = "Streaks", body = Vec<StreakResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Progress"
)]
pub async fn list_streaks(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<StreakResponse>>, ApiError> {
    let streaks = state
        .progress
        .streaks(user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(streaks.into_iter().map(Into::into).collect()))
}

/// Progress overview; unlocks every module the caller has become eligible for
#[utoipa::path(
    get,
    path = "/api/progress/overview",
    params(("X-User-Id" = String, Header, description = "Acting user (UUID)")),
    responses(
        (status = 200, description = "Overview", body = ProgressOverviewResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Progress"
)]
pub async fn get_overview(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ProgressOverviewResponse>, ApiError> {
    let overview = state
        .progress
        .overview(user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(overview.into()))
}

/// Progress of one module with its missions and streak
#[utoipa::path(
    get,
    path = "/api/progress/module/{id}",
    params(
        ("id" = String, Path, description = "Module ID"),
        ("X-User-Id" = String, Header, description = "Acting user (UUID)")
    ),
    responses(
        (status = 200, description = "Module detail", body = ModuleDetailResponse),
        (status = 404, description = "Module not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Progress"
)]
pub async fn get_module_detail(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(module_id): Path<String>,
) -> Result<Json<ModuleDetailResponse>, ApiError> {
    let detail = state
        .progress
        .module_detail(user_id, &module_id)
        .await
        .map_err(error_response)?;

    Ok(Json(detail.into()))
}

/// Re-evaluate every locked module
#[utoipa::path(
    post,
    path = "/api/progress/sync",
    params(("X-User-Id" = String, Header, description = "Acting user (UUID)")),
    responses(
        (status = 200, description = "Progress of every module", body = Vec<ModuleProgressResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Progress"
)]
pub async fn sync_progress(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<ModuleProgressResponse>>, ApiError> {
    let modules = state.progress.sync(user_id).await.map_err(error_response)?;

    Ok(Json(modules.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/streaks", get(list_streaks))
        .route("/api/progress/overview", get(get_overview))
        .route("/api/progress/module/:id", get(get_module_detail))
        .route("/api/progress/sync", post(sync_progress))
}
