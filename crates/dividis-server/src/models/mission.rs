//! Mission - Rewarded tasks and their progress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Catalog mission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MissionResponse {
    pub id: Uuid,
    /// None for global missions
    pub module_id: Option<String>,
    pub title: String,
    pub description: String,
    pub xp_reward: i32,
    pub required_level: i32,
    /// daily | weekly
    pub frequency: Option<String>,
}

impl From<dividis::Mission> for MissionResponse {
    fn from(mission: dividis::Mission) -> Self {
        Self {
            id: mission.id,
            module_id: mission.module_id,
            title: mission.title,
            description: mission.description,
            xp_reward: mission.xp_reward,
            required_level: mission.required_level,
            frequency: mission.frequency.map(|f| f.to_string()),
        }
    }
}

/// Mission progress of the caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MissionProgressResponse {
    pub mission_id: Uuid,
    /// active | completed | failed
    pub state: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<dividis::MissionProgress> for MissionProgressResponse {
    fn from(progress: dividis::MissionProgress) -> Self {
        Self {
            mission_id: progress.mission_id,
            state: progress.state.to_string(),
            started_at: progress.started_at,
            completed_at: progress.completed_at,
        }
    }
}

/// Counter toward a recurring mission's target
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MissionTargetResponse {
    pub current: i32,
    pub target: i32,
}

/// Global mission with its state for the current day or week
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GlobalMissionResponse {
    pub mission: MissionResponse,
    pub state: String,
    /// Absent for missions without a derived counter
    pub progress: Option<MissionTargetResponse>,
}

impl From<dividis::GlobalMissionStatus> for GlobalMissionResponse {
    fn from(status: dividis::GlobalMissionStatus) -> Self {
        Self {
            mission: status.mission.into(),
            state: status.state.to_string(),
            progress: status.progress.map(|p| MissionTargetResponse {
                current: p.current,
                target: p.target,
            }),
        }
    }
}
