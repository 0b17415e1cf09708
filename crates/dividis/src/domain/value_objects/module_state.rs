//! ModuleState - Per-user lifecycle of a module

use serde::{Deserialize, Serialize};

/// Module state for a single user
///
/// Transitions are monotonic: `Locked -> Unlocked -> Completed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModuleState {
    #[default]
    Locked,
    Unlocked,
    Completed,
}

impl ModuleState {
    pub fn is_locked(&self) -> bool {
        matches!(self, ModuleState::Locked)
    }
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleState::Locked => write!(f, "locked"),
            ModuleState::Unlocked => write!(f, "unlocked"),
            ModuleState::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for ModuleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "locked" => Ok(ModuleState::Locked),
            "unlocked" => Ok(ModuleState::Unlocked),
            "completed" => Ok(ModuleState::Completed),
            _ => Err(format!("Unknown module state: {}", s)),
        }
    }
}
