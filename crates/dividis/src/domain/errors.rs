//! Domain Errors
//!
//! Error types for progress engine operations.

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    /// Module unlock denied; `reason` is shown to the user as-is
    #[error("Module {module_id} cannot be unlocked: {reason}")]
    Ineligible { module_id: String, reason: String },

    #[error("Module {module_id} is locked")]
    ModuleLocked { module_id: String },

    #[error("Invalid transition for {entity_type}: {from} -> {to}")]
    InvalidTransition {
        entity_type: String,
        from: String,
        to: String,
    },

    #[error("Repository error: {0}")]
    Repository(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: Uuid) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn not_found_str<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn invalid_transition<T: AsRef<str>>(
        entity_type: T,
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidTransition {
            entity_type: entity_type.as_ref().to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
