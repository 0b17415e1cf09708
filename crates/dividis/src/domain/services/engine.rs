//! Progress Engine
//!
//! Holds the ports shared by every progress operation.

use std::sync::Arc;

use uuid::Uuid;

use super::{GlobalMissionEvaluator, ProgressConfig};
use crate::domain::{errors::DomainError, MissionProgress, ModuleProgress, UnlockedPillar};
use crate::ports::{CatalogRepository, Clock, ProgressRepository};

/// Progress engine over a catalog and a progress store
pub struct ProgressEngine<C: CatalogRepository, P: ProgressRepository> {
    pub(super) catalog: Arc<C>,
    pub(super) progress: Arc<P>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) config: ProgressConfig,
    pub(super) evaluator: GlobalMissionEvaluator,
}

impl<C: CatalogRepository, P: ProgressRepository> ProgressEngine<C, P> {
    pub fn new(
        catalog: Arc<C>,
        progress: Arc<P>,
        clock: Arc<dyn Clock>,
        config: ProgressConfig,
    ) -> Self {
        let evaluator = GlobalMissionEvaluator::new(config.keywords.clone());
        Self {
            catalog,
            progress,
            clock,
            config,
            evaluator,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Module progress rows that exist for a user
    pub async fn module_progress(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ModuleProgress>, DomainError> {
        self.progress.list_module_progress(user_id).await
    }

    /// Mission progress rows that exist for a user
    pub async fn mission_progress(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MissionProgress>, DomainError> {
        self.progress.list_mission_progress(user_id).await
    }

    /// Pillar markers earned by a user
    pub async fn unlocked_pillars(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UnlockedPillar>, DomainError> {
        self.progress.list_unlocked_pillars(user_id).await
    }
}
