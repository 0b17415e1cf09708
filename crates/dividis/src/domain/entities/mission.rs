//! Mission - Rewarded task, and its per-user progress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    value_objects::{MissionFrequency, MissionState},
};

/// Mission - catalog entry. `module_id = None` marks a global mission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mission {
    pub id: Uuid,
    pub module_id: Option<String>,
    pub title: String,
    pub description: String,
    pub xp_reward: i32,
    pub required_level: i32,
    pub frequency: Option<MissionFrequency>,
    pub created_at: DateTime<Utc>,
}

impl Mission {
    pub fn is_global(&self) -> bool {
        self.module_id.is_none()
    }
}

/// Parse a mission identifier supplied by a caller
pub fn parse_mission_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::Validation(format!("Invalid mission ID format: {}", raw)))
}

/// Mission progress for one (user, mission) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissionProgress {
    pub user_id: Uuid,
    pub mission_id: Uuid,
    pub state: MissionState,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl MissionProgress {
    pub fn new(user_id: Uuid, mission_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            mission_id,
            state: MissionState::Active,
            started_at: now,
            completed_at: None,
        }
    }

    /// `active -> completed`. Returns false when already completed.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<bool, DomainError> {
        match self.state {
            MissionState::Active => {
                self.state = MissionState::Completed;
                self.completed_at = Some(now);
                Ok(true)
            }
            MissionState::Completed => Ok(false),
            MissionState::Failed => Err(DomainError::invalid_transition(
                "MissionProgress",
                self.state,
                MissionState::Completed,
            )),
        }
    }

    /// `active -> failed`. Returns false when already failed.
    pub fn fail(&mut self) -> Result<bool, DomainError> {
        match self.state {
            MissionState::Active => {
                self.state = MissionState::Failed;
                Ok(true)
            }
            MissionState::Failed => Ok(false),
            MissionState::Completed => Err(DomainError::invalid_transition(
                "MissionProgress",
                self.state,
                MissionState::Failed,
            )),
        }
    }
}
