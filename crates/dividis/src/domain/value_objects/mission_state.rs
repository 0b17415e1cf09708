//! MissionState - Per-user lifecycle of a mission

use serde::{Deserialize, Serialize};

/// Mission state for a single user
///
/// `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissionState {
    #[default]
    Active,
    Completed,
    Failed,
}

impl MissionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MissionState::Active)
    }
}

impl std::fmt::Display for MissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionState::Active => write!(f, "active"),
            MissionState::Completed => write!(f, "completed"),
            MissionState::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for MissionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(MissionState::Active),
            "completed" => Ok(MissionState::Completed),
            "failed" => Ok(MissionState::Failed),
            _ => Err(format!("Unknown mission state: {}", s)),
        }
    }
}
