//! Declaration Routes - Pillar reflections and unlocked pillars

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use super::{error_response, ApiError};
use crate::auth::CurrentUser;
use crate::models::{
    CreateDeclarationRequest, DeclarationQuery, DeclarationReceiptResponse, DeclarationResponse,
    UnlockedPillarResponse,
};
use crate::AppState;

/// Submit a declaration
#[utoipa::path(
    post,
    path = "/api/declarations",
    params(("X-User-Id" = String, Header, description = "Acting user (UUID)")),
    request_body = CreateDeclarationRequest,
    responses(
        (status = 200, description = "Declaration stored", body = DeclarationReceiptResponse),
        (status = 400, description = "Unknown pillar or empty text"),
        (status = 404, description = "Module not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Declarations"
)]
pub async fn create_declaration(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateDeclarationRequest>,
) -> Result<Json<DeclarationReceiptResponse>, ApiError> {
    let receipt = state
        .progress
        .submit_declaration(
            user_id,
            &payload.module_id,
            &payload.pillar,
            &payload.text,
            payload.synced,
        )
        .await
        .map_err(error_response)?;

    Ok(Json(receipt.into()))
}

/// List the caller's declarations, newest first
#[utoipa::path(
    get,
    path = "/api/declarations",
    params(
        DeclarationQuery,
        ("X-User-Id" = String, Header, description = "Acting user (UUID)")
    ),
    responses(
        (status = 200, description = "Declarations", body = Vec<DeclarationResponse>),
        (status = 400, description = "Unknown pillar"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Declarations"
)]
pub async fn list_declarations(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<DeclarationQuery>,
) -> Result<Json<Vec<DeclarationResponse>>, ApiError> {
    let declarations = state
        .progress
        .declarations(user_id, query.module_id.as_deref(), query.pillar.as_deref())
        .await
        .map_err(error_response)?;

    Ok(Json(declarations.into_iter().map(Into::into).collect()))
}

/// Pillars the caller has opened
#[utoipa::path(
    get,
    path = "/api/pillars",
    params(("X-User-Id" = String, Header, description = "Acting user (UUID)")),
    responses(
        (status = 200, description = "Unlocked pillars", body = Vec<UnlockedPillarResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Declarations"
)]
pub async fn list_unlocked_pillars(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<UnlockedPillarResponse>>, ApiError> {
    let pillars = state
        .progress
        .unlocked_pillars(user_id)
        .await
        .map_err(error_response)?;

    Ok(Json(pillars.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/declarations",
            get(list_declarations).post(create_declaration),
        )
        .route("/api/pillars", get(list_unlocked_pillars))
}
