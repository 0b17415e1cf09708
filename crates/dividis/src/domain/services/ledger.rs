//! Profile Ledger
//!
//! The only write path for XP.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ProgressEngine;
use crate::domain::{errors::DomainError, Profile};
use crate::ports::{CatalogRepository, ProgressRepository, ProgressTransaction};

impl<C: CatalogRepository, P: ProgressRepository> ProgressEngine<C, P> {
    /// Profile of a user, created on first sight
    pub async fn profile(&self, user_id: Uuid) -> Result<Profile, DomainError> {
        if let Some(profile) = self.progress.find_profile(user_id).await? {
            return Ok(profile);
        }

        let mut tx = self.progress.begin().await?;
        let profile = tx.lock_profile(user_id, self.clock.now()).await?;
        tx.commit().await?;
        tracing::info!("Created profile for user {}", user_id);

        Ok(profile)
    }

    /// Add XP to a user's profile
    pub async fn grant_xp(&self, user_id: Uuid, amount: i32) -> Result<Profile, DomainError> {
        let mut tx = self.progress.begin().await?;
        let profile = grant_in(tx.as_mut(), user_id, amount, self.clock.now()).await?;
        tx.commit().await?;

        Ok(profile)
    }
}

/// Grant XP inside an open transaction; the profile row stays locked until commit
pub(super) async fn grant_in(
    tx: &mut dyn ProgressTransaction,
    user_id: Uuid,
    amount: i32,
    now: DateTime<Utc>,
) -> Result<Profile, DomainError> {
    let mut profile = tx.lock_profile(user_id, now).await?;
    let previous_level = profile.level;

    profile.grant_xp(amount, now)?;
    tx.save_profile(&profile).await?;

    tracing::info!(
        "Granted {} XP to user {} (total {}, level {})",
        amount,
        user_id,
        profile.experience_points,
        profile.level
    );
    if profile.level > previous_level {
        tracing::info!("User {} reached level {}", user_id, profile.level);
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use crate::domain::services::test_support::Fixture;
    use crate::domain::DomainError;

    #[tokio::test]
    async fn test_grants_accumulate_and_level_follows() {
        let fx = Fixture::new();

        for (amount, level) in [(40, 1), (60, 2), (99, 2), (1, 3)] {
            let profile = fx.engine.grant_xp(fx.user, amount).await.unwrap();
            assert_eq!(profile.level, level);
            assert_eq!(profile.level, profile.experience_points / 100 + 1);
        }

        let stored = fx.engine.profile(fx.user).await.unwrap();
        assert_eq!(stored.experience_points, 200);
        assert_eq!(stored.level, 3);
    }

    #[tokio::test]
    async fn test_negative_grant_leaves_profile_untouched() {
        let fx = Fixture::new();
        fx.engine.grant_xp(fx.user, 150).await.unwrap();

        let result = fx.engine.grant_xp(fx.user, -50).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(fx.engine.profile(fx.user).await.unwrap().experience_points, 150);
    }

    #[tokio::test]
    async fn test_profile_created_on_first_read() {
        let fx = Fixture::new();
        let profile = fx.engine.profile(fx.user).await.unwrap();
        assert_eq!(profile.experience_points, 0);
        assert_eq!(profile.level, 1);
        assert!(fx.store.has_profile(fx.user).await);
    }
}
