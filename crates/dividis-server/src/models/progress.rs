//! Progress - Profile, streaks and aggregated progress reads

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{MissionProgressResponse, ModuleProgressResponse};
use crate::application::{ModuleDetail, ProgressOverview};

/// XP and level of the caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub experience_points: i32,
    pub level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<dividis::Profile> for ProfileResponse {
    fn from(profile: dividis::Profile) -> Self {
        Self {
            user_id: profile.user_id,
            experience_points: profile.experience_points,
            level: profile.level,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Activity streak in one module
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StreakResponse {
    pub module_id: String,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity: DateTime<Utc>,
}

impl From<dividis::Streak> for StreakResponse {
    fn from(streak: dividis::Streak) -> Self {
        Self {
            module_id: streak.module_id,
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            last_activity: streak.last_activity,
        }
    }
}

/// Progress overview
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProgressOverviewResponse {
    pub total_xp: i32,
    pub level: i32,
    pub modules_unlocked: usize,
    pub missions_completed: usize,
    /// Current streak per module id
    pub current_streaks: BTreeMap<String, i32>,
}

impl From<ProgressOverview> for ProgressOverviewResponse {
    fn from(overview: ProgressOverview) -> Self {
        Self {
            total_xp: overview.total_xp,
            level: overview.level,
            modules_unlocked: overview.modules_unlocked,
            missions_completed: overview.missions_completed,
            current_streaks: overview.current_streaks,
        }
    }
}

/// Progress of one module with its missions and streak
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModuleDetailResponse {
    pub progress: ModuleProgressResponse,
    pub missions: Vec<MissionProgressResponse>,
    pub streak: StreakResponse,
}

impl From<ModuleDetail> for ModuleDetailResponse {
    fn from(detail: ModuleDetail) -> Self {
        Self {
            progress: detail.progress.into(),
            missions: detail.missions.into_iter().map(Into::into).collect(),
            streak: detail.streak.into(),
        }
    }
}
