//! Profile - Cumulative XP and derived level
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Experience points needed per level
pub const XP_PER_LEVEL: i32 = 100;

/// Level reached with the given amount of XP
pub fn level_for(experience_points: i32) -> i32 {
    experience_points / XP_PER_LEVEL + 1
}

/// Profile - one per user, created the first time the user is seen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub user_id: Uuid,
    pub experience_points: i32,
    pub level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            experience_points: 0,
            level: level_for(0),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add XP and recompute the level. XP is never subtracted.
    pub fn grant_xp(&mut self, amount: i32, now: DateTime<Utc>) -> Result<(), DomainError> {
        if amount < 0 {
            return Err(DomainError::Validation(format!(
                "XP amount must be non-negative, got {}",
                amount
            )));
        }

        self.experience_points = self
            .experience_points
            .checked_add(amount)
            .ok_or_else(|| DomainError::Validation("XP total overflow".to_string()))?;
        self.level = level_for(self.experience_points);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(100), 2);
        assert_eq!(level_for(250), 3);
    }

    #[test]
    fn test_grant_xp_recomputes_level() {
        let now = Utc::now();
        let mut profile = Profile::new(Uuid::new_v4(), now);

        for amount in [30, 70, 0, 45, 155] {
            profile.grant_xp(amount, now).unwrap();
            assert_eq!(profile.level, profile.experience_points / 100 + 1);
        }
        assert_eq!(profile.experience_points, 300);
        assert_eq!(profile.level, 4);
    }

    #[test]
    fn test_negative_grant_rejected() {
        let now = Utc::now();
        let mut profile = Profile::new(Uuid::new_v4(), now);
        profile.grant_xp(120, now).unwrap();

        let result = profile.grant_xp(-20, now);
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(profile.experience_points, 120);
        assert_eq!(profile.level, 2);
    }
}
