//! Streak Tracker

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ProgressEngine;
use crate::domain::{errors::DomainError, Streak, StreakUpdate};
use crate::ports::{CatalogRepository, ProgressRepository, ProgressTransaction};

impl<C: CatalogRepository, P: ProgressRepository> ProgressEngine<C, P> {
    /// Streaks of a user, one per module with recorded activity
    pub async fn streaks(&self, user_id: Uuid) -> Result<Vec<Streak>, DomainError> {
        self.progress.list_streaks(user_id).await
    }

    /// Streak of one module, created at zero when the module has no activity yet
    pub async fn module_streak(
        &self,
        user_id: Uuid,
        module_id: &str,
    ) -> Result<Streak, DomainError> {
        if let Some(streak) = self
            .progress
            .list_streaks(user_id)
            .await?
            .into_iter()
            .find(|s| s.module_id == module_id)
        {
            return Ok(streak);
        }

        let mut tx = self.progress.begin().await?;
        let streak = tx.lock_streak(user_id, module_id, self.clock.now()).await?;
        tx.commit().await?;

        Ok(streak)
    }
}

/// Touch the (user, module) streak inside an open transaction
pub(super) async fn touch_in(
    tx: &mut dyn ProgressTransaction,
    user_id: Uuid,
    module_id: &str,
    now: DateTime<Utc>,
) -> Result<Streak, DomainError> {
    let mut streak = tx.lock_streak(user_id, module_id, now).await?;

    match streak.touch(now) {
        StreakUpdate::Extended => tracing::debug!(
            "Streak for user {} in {} extended to {}",
            user_id,
            module_id,
            streak.current_streak
        ),
        StreakUpdate::Reset => tracing::info!(
            "Streak for user {} in {} reset (longest {})",
            user_id,
            module_id,
            streak.longest_streak
        ),
    }

    tx.save_streak(&streak).await?;
    Ok(streak)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::domain::services::test_support::Fixture;

    #[tokio::test]
    async fn test_declarations_on_consecutive_days_extend() {
        let fx = Fixture::new();

        for (day, text) in ["Correr", "Nadar", "Remar"].into_iter().enumerate() {
            if day > 0 {
                fx.clock.advance(Duration::days(1));
            }
            fx.engine
                .submit_declaration(fx.user, "salud", "Estrategias", text, true)
                .await
                .unwrap();
        }

        let streak = fx.engine.module_streak(fx.user, "salud").await.unwrap();
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.longest_streak, 3);
    }

    #[tokio::test]
    async fn test_gap_resets_but_keeps_longest() {
        let fx = Fixture::new();
        for text in ["Uno", "Dos"] {
            fx.engine
                .submit_declaration(fx.user, "salud", "Vision", text, true)
                .await
                .unwrap();
            fx.clock.advance(Duration::days(1));
        }

        fx.clock.advance(Duration::days(2));
        fx.engine
            .submit_declaration(fx.user, "salud", "Vision", "Tres", true)
            .await
            .unwrap();

        let streaks = fx.engine.streaks(fx.user).await.unwrap();
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].current_streak, 1);
        assert_eq!(streaks[0].longest_streak, 2);
    }

    #[tokio::test]
    async fn test_module_streak_is_created_on_read() {
        let fx = Fixture::new();
        assert!(fx.engine.streaks(fx.user).await.unwrap().is_empty());

        let streak = fx.engine.module_streak(fx.user, "intelecto").await.unwrap();
        assert_eq!(streak.module_id, "intelecto");
        assert_eq!(streak.current_streak, 0);
        assert_eq!(fx.engine.streaks(fx.user).await.unwrap().len(), 1);
    }
}
