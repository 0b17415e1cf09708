//! Declaration - Pillar reflections and their rewards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{ProfileResponse, StreakResponse};

/// Submit declaration request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDeclarationRequest {
    pub module_id: String,
    /// Vision | Proposito | Creencias | Estrategias (accents and case ignored)
    pub pillar: String,
    pub text: String,
    /// Whether the client already holds this declaration in sync
    #[serde(default)]
    pub synced: bool,
}

/// Declaration listing filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct DeclarationQuery {
    pub module_id: Option<String>,
    pub pillar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeclarationResponse {
    pub id: Uuid,
    pub module_id: String,
    pub pillar: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced: bool,
}

impl From<dividis::Declaration> for DeclarationResponse {
    fn from(declaration: dividis::Declaration) -> Self {
        Self {
            id: declaration.id,
            module_id: declaration.module_id,
            pillar: declaration.pillar.to_string(),
            text: declaration.text,
            created_at: declaration.created_at,
            updated_at: declaration.updated_at,
            synced: declaration.synced,
        }
    }
}

/// Stored declaration with the reward it earned
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeclarationReceiptResponse {
    pub declaration: DeclarationResponse,
    /// Non-zero only for the first declaration of a pillar
    pub xp_awarded: i32,
    pub profile: ProfileResponse,
    pub streak: StreakResponse,
}

impl From<dividis::DeclarationReceipt> for DeclarationReceiptResponse {
    fn from(receipt: dividis::DeclarationReceipt) -> Self {
        Self {
            declaration: receipt.declaration.into(),
            xp_awarded: receipt.xp_awarded,
            profile: receipt.profile.into(),
            streak: receipt.streak.into(),
        }
    }
}

/// Pillar opened by the caller's first declaration in it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnlockedPillarResponse {
    pub module_id: String,
    pub pillar: String,
    pub unlocked_at: DateTime<Utc>,
}

impl From<dividis::UnlockedPillar> for UnlockedPillarResponse {
    fn from(pillar: dividis::UnlockedPillar) -> Self {
        Self {
            module_id: pillar.module_id,
            pillar: pillar.pillar.to_string(),
            unlocked_at: pillar.unlocked_at,
        }
    }
}
