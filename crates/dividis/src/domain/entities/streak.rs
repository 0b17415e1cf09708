//! Streak - Consecutive-day activity per (user, module)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest gap, in whole elapsed days, that still extends a streak
const MAX_GAP_DAYS: i64 = 1;

/// Outcome of a streak touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    Extended,
    Reset,
}

/// Streak - invariant: `longest_streak >= current_streak`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Streak {
    pub user_id: Uuid,
    pub module_id: String,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity: DateTime<Utc>,
}

impl Streak {
    pub fn new(user_id: Uuid, module_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            module_id: module_id.into(),
            current_streak: 0,
            longest_streak: 0,
            last_activity: now,
        }
    }

    /// Record one qualifying activity at `now`.
    ///
    /// Touches on the same day are not deduplicated: each one extends the streak.
    pub fn touch(&mut self, now: DateTime<Utc>) -> StreakUpdate {
        let update = if (now - self.last_activity).num_days() <= MAX_GAP_DAYS {
            self.current_streak += 1;
            StreakUpdate::Extended
        } else {
            self.current_streak = 1;
            StreakUpdate::Reset
        };

        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_activity = now;
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_first_touch_starts_at_one() {
        let mut streak = Streak::new(Uuid::new_v4(), "salud", start());
        assert_eq!(streak.touch(start()), StreakUpdate::Extended);
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 1);
    }

    #[test]
    fn test_same_day_touches_both_increment() {
        let mut streak = Streak::new(Uuid::new_v4(), "salud", start());
        streak.touch(start());
        streak.touch(start() + Duration::hours(1));
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.last_activity, start() + Duration::hours(1));
    }

    #[test]
    fn test_next_day_extends() {
        let mut streak = Streak::new(Uuid::new_v4(), "salud", start());
        streak.touch(start());
        assert_eq!(
            streak.touch(start() + Duration::hours(30)),
            StreakUpdate::Extended
        );
        assert_eq!(streak.current_streak, 2);
    }

    #[test]
    fn test_two_day_gap_resets_and_keeps_longest() {
        let mut streak = Streak::new(Uuid::new_v4(), "salud", start());
        let mut now = start();
        for _ in 0..4 {
            streak.touch(now);
            now += Duration::hours(20);
        }
        assert_eq!(streak.current_streak, 4);

        let after_gap = streak.last_activity + Duration::days(2);
        assert_eq!(streak.touch(after_gap), StreakUpdate::Reset);
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 4);
        assert_eq!(streak.last_activity, after_gap);
    }
}
