//! Global / Recurring Mission Evaluator
//!
//! Derives the state and progress of missions without a module from recent
//! activity. Nothing here writes to storage; results are recomputed on every call.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::ProgressEngine;
use crate::domain::{
    errors::DomainError, Declaration, Mission, MissionFrequency, MissionProgress, MissionState,
    ModuleProgress, ModuleState,
};
use crate::ports::{CatalogRepository, DeclarationFilter, ProgressRepository};

const DAILY_DECLARATIONS_TARGET: i32 = 1;
const WEEKLY_ACTIVE_DAYS_TARGET: i32 = 5;
const WEEKLY_UNLOCKS_TARGET: i32 = 1;

/// Declarations older than this cannot fall in the current local week
const ACTIVITY_LOOKBACK_DAYS: i64 = 8;

/// What a weekly mission counts, picked from its title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeeklyGoal {
    /// Distinct days of the week with at least one declaration
    ActiveDays,
    /// Modules unlocked during the week
    ModuleUnlocks,
}

/// Title keywords that classify weekly missions (case-insensitive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionKeywords {
    pub streak: Vec<String>,
    pub unlock: Vec<String>,
}

impl Default for MissionKeywords {
    fn default() -> Self {
        Self {
            streak: vec!["racha".to_string(), "streak".to_string()],
            unlock: vec!["desbloquea".to_string(), "unlock".to_string()],
        }
    }
}

impl MissionKeywords {
    /// Streak keywords take precedence over unlock keywords
    pub fn weekly_goal(&self, title: &str) -> Option<WeeklyGoal> {
        let title = title.to_lowercase();
        let contains_any =
            |words: &[String]| words.iter().any(|w| title.contains(&w.to_lowercase()));

        if contains_any(&self.streak) {
            Some(WeeklyGoal::ActiveDays)
        } else if contains_any(&self.unlock) {
            Some(WeeklyGoal::ModuleUnlocks)
        } else {
            None
        }
    }
}

/// Progress toward a recurring goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissionTarget {
    pub current: i32,
    pub target: i32,
}

impl MissionTarget {
    fn reached(&self) -> bool {
        self.current >= self.target
    }
}

/// Derived view of one global mission for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalMissionStatus {
    pub mission: Mission,
    pub state: MissionState,
    pub progress: Option<MissionTarget>,
}

/// Activity the evaluator derives from
#[derive(Debug, Clone, Copy)]
pub struct ActivitySnapshot<'a> {
    pub mission_progress: &'a [MissionProgress],
    pub declarations: &'a [Declaration],
    pub module_progress: &'a [ModuleProgress],
}

#[derive(Debug, Clone)]
pub struct GlobalMissionEvaluator {
    keywords: MissionKeywords,
}

impl GlobalMissionEvaluator {
    pub fn new(keywords: MissionKeywords) -> Self {
        Self { keywords }
    }

    /// Evaluate every global mission in `missions`; module missions are skipped.
    ///
    /// `local_date` maps each instant to its server-local calendar date, so
    /// activity from before an offset change keeps the date it had then.
    pub fn evaluate<F>(
        &self,
        missions: &[Mission],
        activity: &ActivitySnapshot<'_>,
        now: DateTime<Utc>,
        local_date: F,
    ) -> Vec<GlobalMissionStatus>
    where
        F: Fn(DateTime<Utc>) -> NaiveDate,
    {
        let today = local_date(now);
        let days_since_monday = i64::from(today.weekday().num_days_from_monday());
        let week_start = today - Duration::days(days_since_monday);
        let in_week = |date: NaiveDate| date >= week_start && date <= today;

        missions
            .iter()
            .filter(|m| m.is_global())
            .map(|mission| {
                let base = activity
                    .mission_progress
                    .iter()
                    .find(|p| p.mission_id == mission.id)
                    .map_or(MissionState::Active, |p| p.state);

                let progress = match mission.frequency {
                    Some(MissionFrequency::Daily) => {
                        let current = activity
                            .declarations
                            .iter()
                            .filter(|d| local_date(d.created_at) == today)
                            .count();
                        Some(target(current, DAILY_DECLARATIONS_TARGET))
                    }
                    Some(MissionFrequency::Weekly) => {
                        match self.keywords.weekly_goal(&mission.title) {
                            Some(WeeklyGoal::ActiveDays) => {
                                let days: HashSet<NaiveDate> = activity
                                    .declarations
                                    .iter()
                                    .map(|d| local_date(d.created_at))
                                    .filter(|date| in_week(*date))
                                    .collect();
                                Some(target(days.len(), WEEKLY_ACTIVE_DAYS_TARGET))
                            }
                            Some(WeeklyGoal::ModuleUnlocks) => {
                                let current = activity
                                    .module_progress
                                    .iter()
                                    .filter(|p| p.state == ModuleState::Unlocked)
                                    .filter(|p| in_week(local_date(p.last_activity)))
                                    .count();
                                Some(target(current, WEEKLY_UNLOCKS_TARGET))
                            }
                            None => None,
                        }
                    }
                    None => None,
                };

                let state = match progress {
                    Some(p) if p.reached() => MissionState::Completed,
                    _ => base,
                };

                GlobalMissionStatus {
                    mission: mission.clone(),
                    state,
                    progress,
                }
            })
            .collect()
    }
}

fn target(current: usize, target: i32) -> MissionTarget {
    MissionTarget {
        current: i32::try_from(current).unwrap_or(i32::MAX),
        target,
    }
}

impl<C: CatalogRepository, P: ProgressRepository> ProgressEngine<C, P> {
    /// Derived state of every global mission for a user
    pub async fn global_missions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<GlobalMissionStatus>, DomainError> {
        let missions = self.catalog.list_missions().await?;
        let mission_progress = self.progress.list_mission_progress(user_id).await?;
        self.evaluate_global_missions(user_id, &missions, &mission_progress).await
    }

    pub(super) async fn evaluate_global_missions(
        &self,
        user_id: Uuid,
        missions: &[Mission],
        mission_progress: &[MissionProgress],
    ) -> Result<Vec<GlobalMissionStatus>, DomainError> {
        let now = self.clock.now();
        let filter = DeclarationFilter {
            created_since: Some(now - Duration::days(ACTIVITY_LOOKBACK_DAYS)),
            ..DeclarationFilter::default()
        };
        let declarations = self.progress.list_declarations(user_id, &filter).await?;
        let module_progress = self.progress.list_module_progress(user_id).await?;

        Ok(self.evaluator.evaluate(
            missions,
            &ActivitySnapshot {
                mission_progress,
                declarations: &declarations,
                module_progress: &module_progress,
            },
            now,
            |instant| self.clock.local_date(instant),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::test_support::{
        Fixture, DAILY_MISSION, FREE_WEEKLY_MISSION, GATE_MISSION, UNLOCK_MISSION,
        WEEKLY_STREAK_MISSION,
    };
    use crate::domain::Pillar;
    use chrono::{FixedOffset, TimeZone};

    fn status<'a>(statuses: &'a [GlobalMissionStatus], title: &str) -> &'a GlobalMissionStatus {
        statuses
            .iter()
            .find(|s| s.mission.title == title)
            .expect("mission in catalog")
    }

    #[test]
    fn test_keyword_lookup() {
        let keywords = MissionKeywords::default();
        assert_eq!(
            keywords.weekly_goal("Racha de 5 días"),
            Some(WeeklyGoal::ActiveDays)
        );
        assert_eq!(
            keywords.weekly_goal("DESBLOQUEA un módulo nuevo"),
            Some(WeeklyGoal::ModuleUnlocks)
        );
        assert_eq!(keywords.weekly_goal("Reto libre"), None);
    }

    #[test]
    fn test_week_boundaries_follow_local_offset() {
        let evaluator = GlobalMissionEvaluator::new(MissionKeywords::default());
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let missions = vec![Fixture::global_mission(
            "Racha semanal",
            Some(MissionFrequency::Weekly),
        )];
        let user = Uuid::new_v4();

        // Monday 2025-03-10 02:00 UTC is still Sunday evening at UTC-5
        let sunday_local = Utc.with_ymd_and_hms(2025, 3, 10, 2, 0, 0).unwrap();
        let declarations: Vec<Declaration> = (0..5)
            .map(|day| {
                Declaration::new(
                    user,
                    "salud",
                    Pillar::Vision,
                    format!("día {}", day),
                    true,
                    sunday_local + Duration::days(day),
                )
            })
            .collect();

        // Saturday 2025-03-15 at noon local: Sunday's entry is last week
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 17, 0, 0).unwrap();
        let statuses = evaluator.evaluate(
            &missions,
            &ActivitySnapshot {
                mission_progress: &[],
                declarations: &declarations,
                module_progress: &[],
            },
            now,
            |instant| instant.with_timezone(&offset).date_naive(),
        );
        assert_eq!(
            statuses[0].progress,
            Some(MissionTarget {
                current: 4,
                target: 5
            })
        );
        assert_eq!(statuses[0].state, MissionState::Active);
    }

    /// Central European calendar: CET until 2025-03-30 01:00 UTC, CEST after
    fn central_european_date(instant: DateTime<Utc>) -> NaiveDate {
        let switch = Utc.with_ymd_and_hms(2025, 3, 30, 1, 0, 0).unwrap();
        let hours = if instant < switch { 1 } else { 2 };
        let offset = FixedOffset::east_opt(hours * 3600).unwrap();
        instant.with_timezone(&offset).date_naive()
    }

    #[test]
    fn test_offset_change_keeps_each_instant_on_its_own_day() {
        let evaluator = GlobalMissionEvaluator::new(MissionKeywords::default());
        let missions = vec![
            Fixture::global_mission("Diaria", Some(MissionFrequency::Daily)),
            Fixture::global_mission("Racha semanal", Some(MissionFrequency::Weekly)),
        ];
        let user = Uuid::new_v4();
        let declare = |at: DateTime<Utc>, text: &str| {
            Declaration::new(user, "salud", Pillar::Vision, text, true, at)
        };

        // Saturday 23:30 CET; at Sunday's +2h offset it would read as Sunday
        let declarations = vec![
            declare(Utc.with_ymd_and_hms(2025, 3, 29, 22, 30, 0).unwrap(), "sábado"),
            declare(Utc.with_ymd_and_hms(2025, 3, 28, 22, 30, 0).unwrap(), "viernes"),
        ];
        let activity = ActivitySnapshot {
            mission_progress: &[],
            declarations: &declarations,
            module_progress: &[],
        };

        // Sunday 2025-03-30 15:00 CEST
        let now = Utc.with_ymd_and_hms(2025, 3, 30, 13, 0, 0).unwrap();
        let statuses = evaluator.evaluate(&missions, &activity, now, central_european_date);

        let daily = status(&statuses, "Diaria");
        assert_eq!(
            daily.progress,
            Some(MissionTarget {
                current: 0,
                target: 1
            })
        );
        assert_eq!(daily.state, MissionState::Active);
        assert_eq!(
            status(&statuses, "Racha semanal").progress.map(|p| p.current),
            Some(2)
        );
    }

    #[tokio::test]
    async fn test_daily_mission_tracks_todays_declarations() {
        let fx = Fixture::new();

        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        let daily = status(&statuses, DAILY_MISSION);
        assert_eq!(
            daily.progress,
            Some(MissionTarget {
                current: 0,
                target: 1
            })
        );
        assert_eq!(daily.state, MissionState::Active);

        fx.engine
            .submit_declaration(fx.user, "salud", "Vision", "Dormir ocho horas", true)
            .await
            .unwrap();

        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        let daily = status(&statuses, DAILY_MISSION);
        assert_eq!(daily.progress.map(|p| p.current), Some(1));
        assert_eq!(daily.state, MissionState::Completed);

        // next day the counter starts over
        fx.clock.advance(Duration::days(1));
        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        assert_eq!(status(&statuses, DAILY_MISSION).state, MissionState::Active);
    }

    #[tokio::test]
    async fn test_weekly_streak_counts_distinct_days() {
        let fx = Fixture::new();

        // two declarations on the same day count once
        for text in ["Caminar", "Meditar"] {
            fx.engine
                .submit_declaration(fx.user, "salud", "Estrategias", text, true)
                .await
                .unwrap();
        }
        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        assert_eq!(
            status(&statuses, WEEKLY_STREAK_MISSION).progress.map(|p| p.current),
            Some(1)
        );

        // fixture clock starts on a Monday; fill Tuesday through Friday
        for day in 1..5 {
            fx.clock.advance(Duration::days(1));
            let text = format!("día {}", day);
            fx.engine
                .submit_declaration(fx.user, "salud", "Creencias", &text, true)
                .await
                .unwrap();
        }
        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        let weekly = status(&statuses, WEEKLY_STREAK_MISSION);
        assert_eq!(weekly.progress.map(|p| p.current), Some(5));
        assert_eq!(weekly.state, MissionState::Completed);
    }

    #[tokio::test]
    async fn test_weekly_unlock_and_unclassified_missions() {
        let fx = Fixture::new();

        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        assert_eq!(
            status(&statuses, UNLOCK_MISSION).progress.map(|p| p.current),
            Some(0)
        );

        fx.engine.sync_all(fx.user).await.unwrap();
        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        let unlock = status(&statuses, UNLOCK_MISSION);
        assert_eq!(unlock.progress.map(|p| p.current), Some(1));
        assert_eq!(unlock.state, MissionState::Completed);

        let free = status(&statuses, FREE_WEEKLY_MISSION);
        assert_eq!(free.progress, None);
        assert_eq!(free.state, MissionState::Active);

        // no frequency: persisted state only
        let gate = status(&statuses, GATE_MISSION);
        assert_eq!(gate.progress, None);
        assert_eq!(gate.state, MissionState::Active);
        fx.complete_directly(GATE_MISSION).await;
        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        assert_eq!(status(&statuses, GATE_MISSION).state, MissionState::Completed);

        // unlocks from a previous week no longer count
        fx.clock.advance(Duration::days(7));
        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        assert_eq!(status(&statuses, UNLOCK_MISSION).state, MissionState::Active);
    }

    #[tokio::test]
    async fn test_module_missions_are_not_listed() {
        let fx = Fixture::new();
        let statuses = fx.engine.global_missions(fx.user).await.unwrap();
        assert!(statuses.iter().all(|s| s.mission.is_global()));
        assert_eq!(statuses.len(), 5);
    }
}
