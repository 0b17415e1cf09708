//! Progress Configuration
//!
//! Unlock policy table and global-mission keywords.

use std::collections::HashMap;

use super::{MissionKeywords, MissionSelector, UnlockPolicy};

/// Module every user starts from
pub const DEFAULT_ENTRY_MODULE: &str = "salud";
/// Module gated behind XP and a designated global mission
pub const GATED_MODULE: &str = "personalidad";
/// XP needed for [`GATED_MODULE`]
pub const GATED_MODULE_MIN_XP: i32 = 200;
/// Title of the global mission that opens [`GATED_MODULE`]
pub const DEFAULT_GATE_MISSION: &str = "Primera declaración";

static DEFAULT_POLICY: UnlockPolicy = UnlockPolicy::XpThreshold;

/// Configuration of the progress engines
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Unlock policy per module id; unlisted modules use [`UnlockPolicy::XpThreshold`]
    pub policies: HashMap<String, UnlockPolicy>,
    pub keywords: MissionKeywords,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self::empty()
            .with_entry_module(DEFAULT_ENTRY_MODULE)
            .with_gate_mission(MissionSelector::Title(DEFAULT_GATE_MISSION.to_string()))
    }
}

impl ProgressConfig {
    /// No registered policies, default keywords
    pub fn empty() -> Self {
        Self {
            policies: HashMap::new(),
            keywords: MissionKeywords::default(),
        }
    }

    /// Register the entry module, which follows the plain XP threshold
    pub fn with_entry_module(mut self, module_id: impl Into<String>) -> Self {
        self.policies.insert(module_id.into(), UnlockPolicy::XpThreshold);
        self
    }

    /// Set the mission that gates [`GATED_MODULE`]
    pub fn with_gate_mission(self, mission: MissionSelector) -> Self {
        self.with_policy(
            GATED_MODULE,
            UnlockPolicy::XpAndMission {
                min_xp: GATED_MODULE_MIN_XP,
                mission,
            },
        )
    }

    pub fn with_policy(mut self, module_id: impl Into<String>, policy: UnlockPolicy) -> Self {
        self.policies.insert(module_id.into(), policy);
        self
    }

    pub fn with_keywords(mut self, keywords: MissionKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn policy_for(&self, module_id: &str) -> &UnlockPolicy {
        self.policies.get(module_id).unwrap_or(&DEFAULT_POLICY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_table() {
        let config = ProgressConfig::default();
        assert_eq!(config.policy_for("salud"), &UnlockPolicy::XpThreshold);
        assert_eq!(config.policy_for("finanzas"), &UnlockPolicy::XpThreshold);
        assert!(matches!(
            config.policy_for("personalidad"),
            UnlockPolicy::XpAndMission { min_xp: 200, .. }
        ));
    }
}
