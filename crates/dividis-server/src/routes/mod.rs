//! Dividis API Routes
//!
//! - /api/profile, /api/streaks - XP, level and streaks
//! - /api/modules - Module list and unlocks
//! - /api/missions - Mission catalog, completion and failure
//! - /api/progress - Aggregated progress and unlock sync
//! - /api/declarations, /api/pillars - Pillar declarations and their rewards
//!
//! Every route acts on the user named by the `X-User-Id` header.

use axum::http::StatusCode;
use dividis::DomainError;

pub mod declarations;
pub mod missions;
pub mod modules;
pub mod progress;
pub mod swagger;

pub type ApiError = (StatusCode, String);

/// Map a domain error to its HTTP status
pub fn error_response(error: DomainError) -> ApiError {
    let status = match &error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Ineligible { reason, .. } => return (StatusCode::FORBIDDEN, reason.clone()),
        DomainError::ModuleLocked { .. } => StatusCode::FORBIDDEN,
        DomainError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DomainError::Repository(message) => {
            tracing::error!("Repository failure: {}", message);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            );
        }
    };
    (status, error.to_string())
}
