//! Module - Life-area unit of the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ModuleStatus;

/// Catalog module with the caller's state
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModuleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub order: i32,
    pub xp_required: i32,
    /// locked | unlocked | completed
    pub state: String,
}

impl From<ModuleStatus> for ModuleResponse {
    fn from(status: ModuleStatus) -> Self {
        Self {
            id: status.module.id,
            name: status.module.name,
            description: status.module.description,
            icon: status.module.icon,
            order: status.module.order,
            xp_required: status.module.xp_required,
            state: status.state.to_string(),
        }
    }
}

/// Module progress of the caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModuleProgressResponse {
    pub module_id: String,
    pub state: String,
    pub experience_points: i32,
    pub last_activity: DateTime<Utc>,
}

impl From<dividis::ModuleProgress> for ModuleProgressResponse {
    fn from(progress: dividis::ModuleProgress) -> Self {
        Self {
            module_id: progress.module_id,
            state: progress.state.to_string(),
            experience_points: progress.experience_points,
            last_activity: progress.last_activity,
        }
    }
}
