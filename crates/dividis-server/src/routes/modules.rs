//! Module Routes - Catalog with per-user state and unlocks

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use super::{error_response, ApiError};
use crate::auth::CurrentUser;
use crate::models::{ModuleProgressResponse, ModuleResponse};
use crate::AppState;

/// List modules with the caller's state
#[utoipa::path(
    get,
    path = "/api/modules",
    params(("X-User-Id" = String, Header, description = "Acting user (UUID)")),
    responses(
        (status = 200, description = "Modules in unlock order", body = Vec<ModuleResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Modules"
)]
pub async fn list_modules(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<ModuleResponse>>, ApiError> {
    let modules = state
        .progress
        .modules(user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(modules.into_iter().map(Into::into).collect()))
}

/// Unlock a module if the caller is eligible
#[utoipa::path(
    post,
    path = "/api/modules/{id}/unlock",
    params(
        ("id" = String, Path, description = "Module ID"),
        ("X-User-Id" = String, Header, description = "Acting user (UUID)")
    ),
    responses(
        (status = 200, description = "Module open", body = ModuleProgressResponse),
        (status = 403, description = "Unlock requirements not met"),
        (status = 404, description = "Module not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Modules"
)]
pub async fn unlock_module(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(module_id): Path<String>,
) -> Result<Json<ModuleProgressResponse>, ApiError> {
    let progress = state
        .progress
        .unlock_module(user_id, &module_id)
        .await
        .map_err(error_response)?;

    Ok(Json(progress.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/modules", get(list_modules))
        .route("/api/modules/:id/unlock", post(unlock_module))
}
