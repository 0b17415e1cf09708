//! Mission Completion Engine

use uuid::Uuid;

use super::{ledger, streaks, ProgressEngine};
use crate::domain::{errors::DomainError, parse_mission_id, Mission, MissionProgress};
use crate::ports::{CatalogRepository, ProgressRepository};

impl<C: CatalogRepository, P: ProgressRepository> ProgressEngine<C, P> {
    /// Complete a mission and grant its reward.
    ///
    /// The state flip, the XP grant and the streak touch commit together.
    /// Completing an already completed mission returns it unchanged.
    pub async fn complete_mission(
        &self,
        user_id: Uuid,
        mission_id: &str,
    ) -> Result<MissionProgress, DomainError> {
        let mission = self.find_mission(mission_id).await?;
        self.ensure_module_open(user_id, &mission).await?;

        let now = self.clock.now();
        let mut tx = self.progress.begin().await?;
        let mut progress = tx.lock_mission_progress(user_id, mission.id, now).await?;

        if !progress.complete(now)? {
            tracing::debug!("Mission {} already completed by user {}", mission.id, user_id);
            return Ok(progress);
        }
        tx.save_mission_progress(&progress).await?;

        ledger::grant_in(tx.as_mut(), user_id, mission.xp_reward, now).await?;
        if let Some(module_id) = &mission.module_id {
            streaks::touch_in(tx.as_mut(), user_id, module_id, now).await?;
        }

        tx.commit().await?;
        tracing::info!(
            "User {} completed mission '{}' ({})",
            user_id,
            mission.title,
            mission.id
        );

        Ok(progress)
    }

    /// Mark a mission as failed. Failing it again is a no-op.
    pub async fn fail_mission(
        &self,
        user_id: Uuid,
        mission_id: &str,
    ) -> Result<MissionProgress, DomainError> {
        let mission = self.find_mission(mission_id).await?;
        self.ensure_module_open(user_id, &mission).await?;

        let mut tx = self.progress.begin().await?;
        let mut progress = tx
            .lock_mission_progress(user_id, mission.id, self.clock.now())
            .await?;

        if progress.fail()? {
            tx.save_mission_progress(&progress).await?;
            tx.commit().await?;
            tracing::info!("User {} failed mission {}", user_id, mission.id);
        }

        Ok(progress)
    }

    async fn find_mission(&self, mission_id: &str) -> Result<Mission, DomainError> {
        let id = parse_mission_id(mission_id)?;
        self.catalog
            .find_mission(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Mission", id))
    }

    /// Missions of a locked module cannot change state; global missions always can
    async fn ensure_module_open(
        &self,
        user_id: Uuid,
        mission: &Mission,
    ) -> Result<(), DomainError> {
        let Some(module_id) = &mission.module_id else {
            return Ok(());
        };

        let locked = self
            .progress
            .find_module_progress(user_id, module_id)
            .await?
            .map_or(true, |p| p.state.is_locked());

        if locked {
            return Err(DomainError::ModuleLocked {
                module_id: module_id.clone(),
            });
        }
        Ok(())
    }
}
