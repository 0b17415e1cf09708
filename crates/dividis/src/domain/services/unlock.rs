//! Module Unlock Engine
//!
//! Each module id maps to an [`UnlockPolicy`]; the policy expands into
//! criteria checked against an [`UnlockContext`] snapshot of the user.

use std::collections::HashSet;

use uuid::Uuid;

use super::ProgressEngine;
use crate::domain::{errors::DomainError, Mission, MissionState, Module, ModuleProgress};
use crate::ports::{CatalogRepository, ProgressRepository};

/// Identifies a catalog mission from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissionSelector {
    Id(Uuid),
    /// Case-insensitive title match
    Title(String),
}

impl MissionSelector {
    pub fn matches(&self, mission: &Mission) -> bool {
        match self {
            MissionSelector::Id(id) => mission.id == *id,
            MissionSelector::Title(title) => {
                mission.title.trim().to_lowercase() == title.trim().to_lowercase()
            }
        }
    }
}

impl std::fmt::Display for MissionSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionSelector::Id(id) => write!(f, "{}", id),
            MissionSelector::Title(title) => write!(f, "'{}'", title),
        }
    }
}

impl std::str::FromStr for MissionSelector {
    type Err = String;

    /// A UUID selects by id, anything else by title
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty mission selector".to_string());
        }
        Ok(match Uuid::parse_str(s) {
            Ok(id) => MissionSelector::Id(id),
            Err(_) => MissionSelector::Title(s.to_string()),
        })
    }
}

/// How a module becomes eligible for unlocking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockPolicy {
    /// XP reaches the module's own `xp_required`
    XpThreshold,
    /// XP reaches `min_xp` and `mission` is completed
    XpAndMission {
        min_xp: i32,
        mission: MissionSelector,
    },
}

/// A single condition of an unlock policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockCriterion {
    MinXp(i32),
    MissionCompleted(MissionSelector),
}

/// What the unlock rules know about a user
#[derive(Debug, Clone, Default)]
pub struct UnlockContext {
    pub experience_points: i32,
    /// Missions in state `completed`, persisted or derived
    pub completed_missions: Vec<Mission>,
}

impl UnlockContext {
    fn has_completed(&self, selector: &MissionSelector) -> bool {
        self.completed_missions.iter().any(|m| selector.matches(m))
    }
}

impl UnlockPolicy {
    pub fn criteria(&self, module: &Module) -> Vec<UnlockCriterion> {
        match self {
            UnlockPolicy::XpThreshold => vec![UnlockCriterion::MinXp(module.xp_required)],
            UnlockPolicy::XpAndMission { min_xp, mission } => vec![
                UnlockCriterion::MinXp(*min_xp),
                UnlockCriterion::MissionCompleted(mission.clone()),
            ],
        }
    }

    /// `Err` carries the reason of the last unmet criterion
    pub fn evaluate(&self, module: &Module, context: &UnlockContext) -> Result<(), String> {
        let mut unmet = None;

        for criterion in self.criteria(module) {
            match criterion {
                UnlockCriterion::MinXp(min) if context.experience_points < min => {
                    unmet = Some(format!(
                        "Insufficient XP to unlock this module: {} of {} required",
                        context.experience_points, min
                    ));
                }
                UnlockCriterion::MissionCompleted(selector) if !context.has_completed(&selector) => {
                    unmet = Some(format!(
                        "Complete the mission {} to unlock this module",
                        selector
                    ));
                }
                _ => {}
            }
        }

        match unmet {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

impl<C: CatalogRepository, P: ProgressRepository> ProgressEngine<C, P> {
    /// Unlock a module if the user is eligible.
    ///
    /// Idempotent: a module that is already open is returned unchanged.
    pub async fn attempt_unlock(
        &self,
        user_id: Uuid,
        module_id: &str,
    ) -> Result<ModuleProgress, DomainError> {
        let module = self
            .catalog
            .find_module(module_id)
            .await?
            .ok_or_else(|| DomainError::not_found_str("Module", module_id))?;

        if let Some(progress) = self.progress.find_module_progress(user_id, &module.id).await? {
            if !progress.state.is_locked() {
                return Ok(progress);
            }
        }

        let context = self.unlock_context(user_id).await?;
        self.config
            .policy_for(&module.id)
            .evaluate(&module, &context)
            .map_err(|reason| {
                tracing::debug!("Unlock of {} denied for user {}: {}", module.id, user_id, reason);
                DomainError::Ineligible {
                    module_id: module.id.clone(),
                    reason,
                }
            })?;

        let now = self.clock.now();
        let mut tx = self.progress.begin().await?;
        let mut progress = tx.lock_module_progress(user_id, &module.id, now).await?;
        if progress.unlock(now) {
            tx.save_module_progress(&progress).await?;
            tracing::info!("Unlocked module {} for user {}", module.id, user_id);
        }
        tx.commit().await?;

        Ok(progress)
    }

    /// Re-evaluate every locked module of a user and unlock the eligible ones.
    ///
    /// Returns the progress of every catalog module, in catalog order.
    pub async fn sync_all(&self, user_id: Uuid) -> Result<Vec<ModuleProgress>, DomainError> {
        let modules = self.catalog.list_modules().await?;
        let context = self.unlock_context(user_id).await?;

        let now = self.clock.now();
        let mut tx = self.progress.begin().await?;
        let mut results = Vec::with_capacity(modules.len());

        for module in &modules {
            let mut progress = tx.lock_module_progress(user_id, &module.id, now).await?;
            let eligible = progress.state.is_locked()
                && self
                    .config
                    .policy_for(&module.id)
                    .evaluate(module, &context)
                    .is_ok();

            if eligible && progress.unlock(now) {
                tx.save_module_progress(&progress).await?;
                tracing::info!("Unlocked module {} for user {} during sync", module.id, user_id);
            }
            results.push(progress);
        }

        tx.commit().await?;
        Ok(results)
    }

    /// Snapshot of the user's XP and effectively completed missions
    pub async fn unlock_context(&self, user_id: Uuid) -> Result<UnlockContext, DomainError> {
        let experience_points = self
            .progress
            .find_profile(user_id)
            .await?
            .map_or(0, |p| p.experience_points);

        let missions = self.catalog.list_missions().await?;
        let mission_progress = self.progress.list_mission_progress(user_id).await?;

        let mut completed: HashSet<Uuid> = mission_progress
            .iter()
            .filter(|p| p.state == MissionState::Completed)
            .map(|p| p.mission_id)
            .collect();

        let statuses = self
            .evaluate_global_missions(user_id, &missions, &mission_progress)
            .await?;
        completed.extend(
            statuses
                .iter()
                .filter(|s| s.state == MissionState::Completed)
                .map(|s| s.mission.id),
        );

        Ok(UnlockContext {
            experience_points,
            completed_missions: missions
                .into_iter()
                .filter(|m| completed.contains(&m.id))
                .collect(),
        })
    }
}
