//! Module - Thematic content area, and its per-user progress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{errors::DomainError, value_objects::ModuleState};

const DECLARATION_BASE_XP: i32 = 20;
const DECLARATION_XP_PER_RANK: i32 = 10;

/// Module - catalog entry, seeded by migrations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub order: i32,
    pub xp_required: i32,
}

impl Module {
    /// XP granted for the first declaration of a pillar in this module
    pub fn declaration_bonus(&self) -> i32 {
        (DECLARATION_BASE_XP + DECLARATION_XP_PER_RANK * (self.order - 1)).max(0)
    }
}

/// Module progress for one (user, module) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleProgress {
    pub user_id: Uuid,
    pub module_id: String,
    pub state: ModuleState,
    /// Module-scoped counter, not consulted by unlock rules
    pub experience_points: i32,
    pub last_activity: DateTime<Utc>,
}

impl ModuleProgress {
    pub fn new(user_id: Uuid, module_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            module_id: module_id.into(),
            state: ModuleState::Locked,
            experience_points: 0,
            last_activity: now,
        }
    }

    /// `locked -> unlocked`. Returns false when the module was already open.
    pub fn unlock(&mut self, now: DateTime<Utc>) -> bool {
        if !self.state.is_locked() {
            return false;
        }
        self.state = ModuleState::Unlocked;
        self.last_activity = now;
        true
    }

    /// `unlocked -> completed`
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<bool, DomainError> {
        match self.state {
            ModuleState::Locked => Err(DomainError::invalid_transition(
                "ModuleProgress",
                self.state,
                ModuleState::Completed,
            )),
            ModuleState::Unlocked => {
                self.state = ModuleState::Completed;
                self.last_activity = now;
                Ok(true)
            }
            ModuleState::Completed => Ok(false),
        }
    }
}
