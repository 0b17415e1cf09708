//! MissionFrequency - Recurrence of global missions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissionFrequency {
    Daily,
    Weekly,
}

impl std::fmt::Display for MissionFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionFrequency::Daily => write!(f, "daily"),
            MissionFrequency::Weekly => write!(f, "weekly"),
        }
    }
}

impl std::str::FromStr for MissionFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(MissionFrequency::Daily),
            "weekly" => Ok(MissionFrequency::Weekly),
            _ => Err(format!("Unknown mission frequency: {}", s)),
        }
    }
}
