//! Progress Application Service (Use Case)
//!
//! Orchestrates the progress engine for the HTTP layer and assembles the
//! aggregated reads (overview, module detail, module list).

use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use dividis::{
    CatalogRepository, Declaration, DeclarationReceipt, DomainError, GlobalMissionStatus, Mission,
    MissionProgress, MissionState, Module, ModuleProgress, ModuleState, Profile,
    ProgressEngine, ProgressRepository, Streak, UnlockedPillar,
};

/// Catalog module with the user's state
#[derive(Debug, Clone)]
pub struct ModuleStatus {
    pub module: Module,
    pub state: ModuleState,
}

/// Aggregated progress of a user
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOverview {
    pub total_xp: i32,
    pub level: i32,
    pub modules_unlocked: usize,
    pub missions_completed: usize,
    pub current_streaks: BTreeMap<String, i32>,
}

impl ProgressOverview {
    pub fn from_parts(
        profile: &Profile,
        modules: &[ModuleProgress],
        missions: &[MissionProgress],
        streaks: &[Streak],
    ) -> Self {
        Self {
            total_xp: profile.experience_points,
            level: profile.level,
            modules_unlocked: modules
                .iter()
                .filter(|m| m.state == ModuleState::Unlocked)
                .count(),
            missions_completed: missions
                .iter()
                .filter(|m| m.state == MissionState::Completed)
                .count(),
            current_streaks: streaks
                .iter()
                .map(|s| (s.module_id.clone(), s.current_streak))
                .collect(),
        }
    }
}

/// One module's progress with its mission rows and streak
#[derive(Debug, Clone)]
pub struct ModuleDetail {
    pub progress: ModuleProgress,
    pub missions: Vec<MissionProgress>,
    pub streak: Streak,
}

/// Application service for progress operations
pub struct ProgressService<C: CatalogRepository, P: ProgressRepository> {
    engine: ProgressEngine<C, P>,
}

impl<C: CatalogRepository, P: ProgressRepository> ProgressService<C, P> {
    pub fn new(engine: ProgressEngine<C, P>) -> Self {
        Self { engine }
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<Profile, DomainError> {
        self.engine.profile(user_id).await
    }

    /// Catalog modules in order, each with the user's state
    pub async fn modules(&self, user_id: Uuid) -> Result<Vec<ModuleStatus>, DomainError> {
        let modules = self.engine.catalog().list_modules().await?;
        let states: HashMap<String, ModuleState> = self
            .engine
            .module_progress(user_id)
            .await?
            .into_iter()
            .map(|p| (p.module_id, p.state))
            .collect();

        Ok(with_states(modules, &states))
    }

    pub async fn unlock_module(
        &self,
        user_id: Uuid,
        module_id: &str,
    ) -> Result<ModuleProgress, DomainError> {
        self.engine.attempt_unlock(user_id, module_id).await
    }

    pub async fn sync(&self, user_id: Uuid) -> Result<Vec<ModuleProgress>, DomainError> {
        self.engine.sync_all(user_id).await
    }

    /// Missions of the modules the user has unlocked
    pub async fn available_missions(&self, user_id: Uuid) -> Result<Vec<Mission>, DomainError> {
        let open: HashSet<String> = self
            .engine
            .module_progress(user_id)
            .await?
            .into_iter()
            .filter(|p| !p.state.is_locked())
            .map(|p| p.module_id)
            .collect();
        let missions = self.engine.catalog().list_missions().await?;

        Ok(available_in(missions, &open))
    }

    pub async fn global_missions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<GlobalMissionStatus>, DomainError> {
        self.engine.global_missions(user_id).await
    }

    pub async fn complete_mission(
        &self,
        user_id: Uuid,
        mission_id: &str,
    ) -> Result<MissionProgress, DomainError> {
        self.engine.complete_mission(user_id, mission_id).await
    }

    pub async fn fail_mission(
        &self,
        user_id: Uuid,
        mission_id: &str,
    ) -> Result<MissionProgress, DomainError> {
        self.engine.fail_mission(user_id, mission_id).await
    }

    /// Overview after unlocking everything the user has become eligible for
    pub async fn overview(&self, user_id: Uuid) -> Result<ProgressOverview, DomainError> {
        let modules = self.engine.sync_all(user_id).await?;
        let profile = self.engine.profile(user_id).await?;
        let missions = self.engine.mission_progress(user_id).await?;
        let streaks = self.engine.streaks(user_id).await?;

        Ok(ProgressOverview::from_parts(
            &profile, &modules, &missions, &streaks,
        ))
    }

    pub async fn module_detail(
        &self,
        user_id: Uuid,
        module_id: &str,
    ) -> Result<ModuleDetail, DomainError> {
        let module = self
            .engine
            .catalog()
            .find_module(module_id)
            .await?
            .ok_or_else(|| DomainError::not_found_str("Module", module_id))?;

        let progress = self
            .engine
            .sync_all(user_id)
            .await?
            .into_iter()
            .find(|p| p.module_id == module.id)
            .ok_or_else(|| DomainError::not_found_str("ModuleProgress", &module.id))?;

        let mission_ids: HashSet<Uuid> = self
            .engine
            .catalog()
            .list_missions()
            .await?
            .into_iter()
            .filter(|m| m.module_id.as_deref() == Some(module.id.as_str()))
            .map(|m| m.id)
            .collect();
        let missions = self
            .engine
            .mission_progress(user_id)
            .await?
            .into_iter()
            .filter(|p| mission_ids.contains(&p.mission_id))
            .collect();

        let streak = self.engine.module_streak(user_id, &module.id).await?;

        Ok(ModuleDetail {
            progress,
            missions,
            streak,
        })
    }

    pub async fn streaks(&self, user_id: Uuid) -> Result<Vec<Streak>, DomainError> {
        self.engine.streaks(user_id).await
    }

    pub async fn submit_declaration(
        &self,
        user_id: Uuid,
        module_id: &str,
        pillar: &str,
        text: &str,
        synced: bool,
    ) -> Result<DeclarationReceipt, DomainError> {
        self.engine
            .submit_declaration(user_id, module_id, pillar, text, synced)
            .await
    }

    pub async fn declarations(
        &self,
        user_id: Uuid,
        module_id: Option<&str>,
        pillar: Option<&str>,
    ) -> Result<Vec<Declaration>, DomainError> {
        self.engine.declarations(user_id, module_id, pillar).await
    }

    pub async fn unlocked_pillars(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UnlockedPillar>, DomainError> {
        self.engine.unlocked_pillars(user_id).await
    }
}

fn with_states(modules: Vec<Module>, states: &HashMap<String, ModuleState>) -> Vec<ModuleStatus> {
    modules
        .into_iter()
        .map(|module| {
            let state = states.get(&module.id).copied().unwrap_or_default();
            ModuleStatus { module, state }
        })
        .collect()
}

fn available_in(missions: Vec<Mission>, open_modules: &HashSet<String>) -> Vec<Mission> {
    missions
        .into_iter()
        .filter(|m| {
            m.module_id
                .as_ref()
                .is_some_and(|module_id| open_modules.contains(module_id))
        })
        .collect()
}
