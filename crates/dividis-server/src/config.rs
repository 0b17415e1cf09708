//! Server configuration from Shuttle secrets, falling back to the environment

use anyhow::{bail, Context};

use dividis::domain::{DEFAULT_ENTRY_MODULE, DEFAULT_GATE_MISSION};
use dividis::{MissionKeywords, MissionSelector, ProgressConfig};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer token; `None` disables authentication
    pub api_key: Option<String>,
    pub progress: ProgressConfig,
}

impl AppConfig {
    /// Build the configuration from a key lookup
    ///
    /// - `DIVIDIS_API_KEY`
    /// - `DIVIDIS_INITIAL_MODULE` (default `salud`)
    /// - `DIVIDIS_GATE_MISSION`: mission id or title (default "Primera declaración")
    /// - `DIVIDIS_STREAK_KEYWORDS`, `DIVIDIS_UNLOCK_KEYWORDS`: comma separated
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_key = lookup("DIVIDIS_API_KEY").filter(|k| !k.trim().is_empty());

        let initial_module = lookup("DIVIDIS_INITIAL_MODULE")
            .unwrap_or_else(|| DEFAULT_ENTRY_MODULE.to_string());
        if initial_module.trim().is_empty() {
            bail!("DIVIDIS_INITIAL_MODULE must not be empty");
        }

        let gate_mission = lookup("DIVIDIS_GATE_MISSION")
            .unwrap_or_else(|| DEFAULT_GATE_MISSION.to_string())
            .parse::<MissionSelector>()
            .map_err(anyhow::Error::msg)
            .context("Invalid DIVIDIS_GATE_MISSION")?;

        let defaults = MissionKeywords::default();
        let keywords = MissionKeywords {
            streak: keyword_list(lookup("DIVIDIS_STREAK_KEYWORDS"), defaults.streak)
                .context("Invalid DIVIDIS_STREAK_KEYWORDS")?,
            unlock: keyword_list(lookup("DIVIDIS_UNLOCK_KEYWORDS"), defaults.unlock)
                .context("Invalid DIVIDIS_UNLOCK_KEYWORDS")?,
        };

        tracing::info!(
            "Entry module {}, gate mission {}",
            initial_module.trim(),
            gate_mission
        );

        let progress = ProgressConfig::empty()
            .with_entry_module(initial_module.trim())
            .with_gate_mission(gate_mission)
            .with_keywords(keywords);

        Ok(Self { api_key, progress })
    }
}

fn keyword_list(raw: Option<String>, default: Vec<String>) -> anyhow::Result<Vec<String>> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let words: Vec<String> = raw
        .split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        bail!("at least one keyword is required");
    }
    Ok(words)
}
