//! Declaration - Free-text reflection tied to (user, module, pillar)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Pillar;

/// Declaration - unique on (user, module, pillar, text)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Declaration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: String,
    pub pillar: Pillar,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Whether the client copy has been reconciled with the server
    pub synced: bool,
}

impl Declaration {
    pub fn new(
        user_id: Uuid,
        module_id: impl Into<String>,
        pillar: Pillar,
        text: impl Into<String>,
        synced: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            module_id: module_id.into(),
            pillar,
            text: text.into(),
            created_at: now,
            updated_at: now,
            synced,
        }
    }
}

/// Pillar-level unlock marker, unique per (user, module, pillar)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnlockedPillar {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: String,
    pub pillar: Pillar,
    pub unlocked_at: DateTime<Utc>,
}

impl UnlockedPillar {
    pub fn new(
        user_id: Uuid,
        module_id: impl Into<String>,
        pillar: Pillar,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            module_id: module_id.into(),
            pillar,
            unlocked_at: now,
        }
    }
}
