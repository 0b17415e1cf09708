//! In-memory ports for engine tests.
//!
//! A single async mutex stands in for row locks: a transaction holds it from
//! `begin` until it is committed or dropped, and writes go to a working copy
//! that only replaces the stored state on commit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{ProgressConfig, ProgressEngine, DEFAULT_GATE_MISSION};
use crate::domain::{
    errors::DomainError, Declaration, Mission, MissionFrequency, MissionProgress, MissionState,
    Module, ModuleProgress, Profile, Streak, UnlockedPillar,
};
use crate::ports::{
    CatalogRepository, Clock, DeclarationFilter, ProgressRepository, ProgressTransaction,
};

pub(crate) const GATE_MISSION: &str = DEFAULT_GATE_MISSION;
pub(crate) const DAILY_MISSION: &str = "Declaración diaria";
pub(crate) const WEEKLY_STREAK_MISSION: &str = "Racha de 5 días";
pub(crate) const UNLOCK_MISSION: &str = "Desbloquea un módulo";
pub(crate) const FREE_WEEKLY_MISSION: &str = "Reto semanal libre";
pub(crate) const SALUD_MISSION: &str = "Bebe dos litros de agua";
pub(crate) const INTELECTO_MISSION: &str = "Lee veinte páginas";

pub(crate) struct FixedClock {
    now: std::sync::Mutex<DateTime<Utc>>,
    offset: FixedOffset,
}

impl FixedClock {
    pub(crate) fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
            offset,
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    profiles: HashMap<Uuid, Profile>,
    modules: HashMap<(Uuid, String), ModuleProgress>,
    missions: HashMap<(Uuid, Uuid), MissionProgress>,
    streaks: HashMap<(Uuid, String), Streak>,
    declarations: Vec<Declaration>,
    pillars: Vec<UnlockedPillar>,
}

pub(crate) struct MemoryStore {
    modules: Vec<Module>,
    missions: Vec<Mission>,
    state: Arc<Mutex<MemoryState>>,
    fail_profile_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub(crate) fn new(modules: Vec<Module>, missions: Vec<Mission>) -> Self {
        Self {
            modules,
            missions,
            state: Arc::new(Mutex::new(MemoryState::default())),
            fail_profile_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every profile write fail with a repository error
    pub(crate) fn fail_profile_writes(&self, fail: bool) {
        self.fail_profile_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) async fn has_profile(&self, user_id: Uuid) -> bool {
        self.state.lock().await.profiles.contains_key(&user_id)
    }

    pub(crate) async fn put_mission_progress(&self, progress: MissionProgress) {
        self.state
            .lock()
            .await
            .missions
            .insert((progress.user_id, progress.mission_id), progress);
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn find_module(&self, id: &str) -> Result<Option<Module>, DomainError> {
        Ok(self.modules.iter().find(|m| m.id == id).cloned())
    }

    async fn list_modules(&self) -> Result<Vec<Module>, DomainError> {
        let mut modules = self.modules.clone();
        modules.sort_by_key(|m| m.order);
        Ok(modules)
    }

    async fn find_mission(&self, id: Uuid) -> Result<Option<Mission>, DomainError> {
        Ok(self.missions.iter().find(|m| m.id == id).cloned())
    }

    async fn list_missions(&self) -> Result<Vec<Mission>, DomainError> {
        Ok(self.missions.clone())
    }
}

#[async_trait]
impl ProgressRepository for MemoryStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError> {
        Ok(self.state.lock().await.profiles.get(&user_id).cloned())
    }

    async fn find_module_progress(
        &self,
        user_id: Uuid,
        module_id: &str,
    ) -> Result<Option<ModuleProgress>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.modules.get(&(user_id, module_id.to_string())).cloned())
    }

    async fn list_module_progress(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ModuleProgress>, DomainError> {
        let state = self.state.lock().await;
        let mut rows: Vec<_> = state
            .modules
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.module_id.cmp(&b.module_id));
        Ok(rows)
    }

    async fn list_mission_progress(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MissionProgress>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .missions
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_streaks(&self, user_id: Uuid) -> Result<Vec<Streak>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .streaks
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_declarations(
        &self,
        user_id: Uuid,
        filter: &DeclarationFilter,
    ) -> Result<Vec<Declaration>, DomainError> {
        let state = self.state.lock().await;
        let mut rows: Vec<_> = state
            .declarations
            .iter()
            .filter(|d| d.user_id == user_id)
            .filter(|d| filter.module_id.as_deref().map_or(true, |m| d.module_id == m))
            .filter(|d| filter.pillar.map_or(true, |p| d.pillar == p))
            .filter(|d| filter.created_since.map_or(true, |t| d.created_at >= t))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_unlocked_pillars(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UnlockedPillar>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .pillars
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn ProgressTransaction>, DomainError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction {
            guard,
            working,
            fail_profile_writes: self.fail_profile_writes.load(Ordering::SeqCst),
        }))
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    fail_profile_writes: bool,
}

#[async_trait]
impl ProgressTransaction for MemoryTransaction {
    async fn lock_profile(
        &mut self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Profile, DomainError> {
        Ok(self
            .working
            .profiles
            .entry(user_id)
            .or_insert_with(|| Profile::new(user_id, now))
            .clone())
    }

    async fn save_profile(&mut self, profile: &Profile) -> Result<(), DomainError> {
        if self.fail_profile_writes {
            return Err(DomainError::Repository("profile write failed".to_string()));
        }
        self.working.profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn lock_module_progress(
        &mut self,
        user_id: Uuid,
        module_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ModuleProgress, DomainError> {
        Ok(self
            .working
            .modules
            .entry((user_id, module_id.to_string()))
            .or_insert_with(|| ModuleProgress::new(user_id, module_id, now))
            .clone())
    }

    async fn save_module_progress(
        &mut self,
        progress: &ModuleProgress,
    ) -> Result<(), DomainError> {
        self.working.modules.insert(
            (progress.user_id, progress.module_id.clone()),
            progress.clone(),
        );
        Ok(())
    }

    async fn lock_mission_progress(
        &mut self,
        user_id: Uuid,
        mission_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<MissionProgress, DomainError> {
        Ok(self
            .working
            .missions
            .entry((user_id, mission_id))
            .or_insert_with(|| MissionProgress::new(user_id, mission_id, now))
            .clone())
    }

    async fn save_mission_progress(
        &mut self,
        progress: &MissionProgress,
    ) -> Result<(), DomainError> {
        self.working
            .missions
            .insert((progress.user_id, progress.mission_id), progress.clone());
        Ok(())
    }

    async fn lock_streak(
        &mut self,
        user_id: Uuid,
        module_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Streak, DomainError> {
        Ok(self
            .working
            .streaks
            .entry((user_id, module_id.to_string()))
            .or_insert_with(|| Streak::new(user_id, module_id, now))
            .clone())
    }

    async fn save_streak(&mut self, streak: &Streak) -> Result<(), DomainError> {
        self.working
            .streaks
            .insert((streak.user_id, streak.module_id.clone()), streak.clone());
        Ok(())
    }

    async fn insert_declaration(
        &mut self,
        declaration: &Declaration,
    ) -> Result<Declaration, DomainError> {
        let existing = self.working.declarations.iter().find(|d| {
            d.user_id == declaration.user_id
                && d.module_id == declaration.module_id
                && d.pillar == declaration.pillar
                && d.text == declaration.text
        });
        if let Some(existing) = existing {
            return Ok(existing.clone());
        }
        self.working.declarations.push(declaration.clone());
        Ok(declaration.clone())
    }

    async fn count_other_declarations(
        &mut self,
        declaration: &Declaration,
    ) -> Result<i64, DomainError> {
        let count = self
            .working
            .declarations
            .iter()
            .filter(|d| {
                d.id != declaration.id
                    && d.user_id == declaration.user_id
                    && d.module_id == declaration.module_id
                    && d.pillar == declaration.pillar
            })
            .count();
        Ok(count as i64)
    }

    async fn insert_unlocked_pillar(
        &mut self,
        pillar: &UnlockedPillar,
    ) -> Result<bool, DomainError> {
        let exists = self.working.pillars.iter().any(|p| {
            p.user_id == pillar.user_id
                && p.module_id == pillar.module_id
                && p.pillar == pillar.pillar
        });
        if !exists {
            self.working.pillars.push(pillar.clone());
        }
        Ok(!exists)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let MemoryTransaction {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

/// Engine wired to an in-memory store, starting on Monday 2025-03-10 10:00 (UTC+1)
pub(crate) struct Fixture {
    pub engine: ProgressEngine<MemoryStore, MemoryStore>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub user: Uuid,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::with_config(ProgressConfig::default())
    }

    pub(crate) fn with_config(config: ProgressConfig) -> Self {
        let modules = vec![
            Self::module("salud", 1, 0),
            Self::module("personalidad", 2, 200),
            Self::module("intelecto", 3, 400),
        ];
        let missions = vec![
            Self::module_mission("salud", SALUD_MISSION, 50),
            Self::module_mission("intelecto", INTELECTO_MISSION, 30),
            Self::global_mission(GATE_MISSION, None),
            Self::global_mission(DAILY_MISSION, Some(MissionFrequency::Daily)),
            Self::global_mission(WEEKLY_STREAK_MISSION, Some(MissionFrequency::Weekly)),
            Self::global_mission(UNLOCK_MISSION, Some(MissionFrequency::Weekly)),
            Self::global_mission(FREE_WEEKLY_MISSION, Some(MissionFrequency::Weekly)),
        ];

        let offset = FixedOffset::east_opt(3600).unwrap();
        let start = offset
            .with_ymd_and_hms(2025, 3, 10, 10, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        let store = Arc::new(MemoryStore::new(modules, missions));
        let clock = Arc::new(FixedClock::new(start, offset));
        let engine = ProgressEngine::new(store.clone(), store.clone(), clock.clone(), config);

        Self {
            engine,
            store,
            clock,
            user: Uuid::new_v4(),
        }
    }

    pub(crate) fn module(id: &str, order: i32, xp_required: i32) -> Module {
        Module {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            icon: String::new(),
            order,
            xp_required,
        }
    }

    pub(crate) fn global_mission(title: &str, frequency: Option<MissionFrequency>) -> Mission {
        Mission {
            id: Uuid::new_v4(),
            module_id: None,
            title: title.to_string(),
            description: String::new(),
            xp_reward: 50,
            required_level: 1,
            frequency,
            created_at: Utc::now(),
        }
    }

    fn module_mission(module_id: &str, title: &str, xp_reward: i32) -> Mission {
        Mission {
            module_id: Some(module_id.to_string()),
            xp_reward,
            ..Self::global_mission(title, None)
        }
    }

    pub(crate) fn mission(&self, title: &str) -> Mission {
        self.store
            .missions
            .iter()
            .find(|m| m.title == title)
            .cloned()
            .expect("mission in fixture catalog")
    }

    /// Mark a mission completed without going through the engine
    pub(crate) async fn complete_directly(&self, title: &str) {
        let mut progress = MissionProgress::new(self.user, self.mission(title).id, self.clock.now());
        progress.state = MissionState::Completed;
        progress.completed_at = Some(self.clock.now());
        self.store.put_mission_progress(progress).await;
    }
}
