//! Progress Repository Port
//!
//! Per-user progress rows. Reads go straight to the store; every state
//! transition goes through a [`ProgressTransaction`], which hands out rows
//! already locked for the rest of the transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    errors::DomainError, Declaration, MissionProgress, ModuleProgress, Pillar, Profile, Streak,
    UnlockedPillar,
};

/// Filter for declaration listings
#[derive(Debug, Clone, Default)]
pub struct DeclarationFilter {
    pub module_id: Option<String>,
    pub pillar: Option<Pillar>,
    /// Only declarations created at or after this instant
    pub created_since: Option<DateTime<Utc>>,
}

/// Repository interface for per-user progress
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Find the profile of a user
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError>;

    /// Find progress for one module
    async fn find_module_progress(
        &self,
        user_id: Uuid,
        module_id: &str,
    ) -> Result<Option<ModuleProgress>, DomainError>;

    /// All module progress rows of a user
    async fn list_module_progress(&self, user_id: Uuid)
        -> Result<Vec<ModuleProgress>, DomainError>;

    /// All mission progress rows of a user
    async fn list_mission_progress(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MissionProgress>, DomainError>;

    /// All streaks of a user
    async fn list_streaks(&self, user_id: Uuid) -> Result<Vec<Streak>, DomainError>;

    /// Declarations of a user, newest first
    async fn list_declarations(
        &self,
        user_id: Uuid,
        filter: &DeclarationFilter,
    ) -> Result<Vec<Declaration>, DomainError>;

    /// Pillar markers of a user
    async fn list_unlocked_pillars(&self, user_id: Uuid)
        -> Result<Vec<UnlockedPillar>, DomainError>;

    /// Start a transaction for state transitions
    async fn begin(&self) -> Result<Box<dyn ProgressTransaction>, DomainError>;
}

/// A storage transaction over one user's progress rows.
///
/// `lock_*` methods get-or-create the row and hold it locked until
/// [`commit`](ProgressTransaction::commit). Dropping the transaction without
/// committing discards every write made through it.
#[async_trait]
pub trait ProgressTransaction: Send {
    async fn lock_profile(
        &mut self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Profile, DomainError>;

    async fn save_profile(&mut self, profile: &Profile) -> Result<(), DomainError>;

    async fn lock_module_progress(
        &mut self,
        user_id: Uuid,
        module_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ModuleProgress, DomainError>;

    async fn save_module_progress(&mut self, progress: &ModuleProgress)
        -> Result<(), DomainError>;

    async fn lock_mission_progress(
        &mut self,
        user_id: Uuid,
        mission_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<MissionProgress, DomainError>;

    async fn save_mission_progress(
        &mut self,
        progress: &MissionProgress,
    ) -> Result<(), DomainError>;

    async fn lock_streak(
        &mut self,
        user_id: Uuid,
        module_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Streak, DomainError>;

    async fn save_streak(&mut self, streak: &Streak) -> Result<(), DomainError>;

    /// Store a declaration. An identical (user, module, pillar, text) row is
    /// kept as-is and returned instead.
    async fn insert_declaration(
        &mut self,
        declaration: &Declaration,
    ) -> Result<Declaration, DomainError>;

    /// Declarations on the same (user, module, pillar) other than `declaration`
    async fn count_other_declarations(
        &mut self,
        declaration: &Declaration,
    ) -> Result<i64, DomainError>;

    /// Record a pillar marker. Returns false when one already existed.
    async fn insert_unlocked_pillar(&mut self, pillar: &UnlockedPillar)
        -> Result<bool, DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
