//! PostgreSQL implementation of ProgressRepository
//!
//! Every `lock_*` call inserts the row if missing and then takes a
//! `SELECT ... FOR UPDATE` lock held until the transaction ends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use dividis::{
    Declaration, DeclarationFilter, DomainError, MissionProgress, MissionState, ModuleProgress,
    ModuleState, Pillar, Profile, ProgressRepository, ProgressTransaction, Streak, UnlockedPillar,
};

/// PostgreSQL implementation of ProgressRepository
pub struct PgProgressRepository {
    pool: PgPool,
}

impl PgProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================
// Row types
// ============================================

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    experience_points: i32,
    level: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            experience_points: row.experience_points,
            level: row.level,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ModuleProgressRow {
    user_id: Uuid,
    module_id: String,
    state: String,
    experience_points: i32,
    last_activity: DateTime<Utc>,
}

impl TryFrom<ModuleProgressRow> for ModuleProgress {
    type Error = DomainError;

    fn try_from(row: ModuleProgressRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            module_id: row.module_id,
            state: row.state.parse::<ModuleState>().map_err(DomainError::Repository)?,
            experience_points: row.experience_points,
            last_activity: row.last_activity,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MissionProgressRow {
    user_id: Uuid,
    mission_id: Uuid,
    state: String,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<MissionProgressRow> for MissionProgress {
    type Error = DomainError;

    fn try_from(row: MissionProgressRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            mission_id: row.mission_id,
            state: row.state.parse::<MissionState>().map_err(DomainError::Repository)?,
            started_at: row.started_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StreakRow {
    user_id: Uuid,
    module_id: String,
    current_streak: i32,
    longest_streak: i32,
    last_activity: DateTime<Utc>,
}

impl From<StreakRow> for Streak {
    fn from(row: StreakRow) -> Self {
        Self {
            user_id: row.user_id,
            module_id: row.module_id,
            current_streak: row.current_streak,
            longest_streak: row.longest_streak,
            last_activity: row.last_activity,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DeclarationRow {
    id: Uuid,
    user_id: Uuid,
    module_id: String,
    pillar: String,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    synced: bool,
}

impl TryFrom<DeclarationRow> for Declaration {
    type Error = DomainError;

    fn try_from(row: DeclarationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            module_id: row.module_id,
            pillar: row.pillar.parse::<Pillar>().map_err(DomainError::Repository)?,
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
            synced: row.synced,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UnlockedPillarRow {
    id: Uuid,
    user_id: Uuid,
    module_id: String,
    pillar: String,
    unlocked_at: DateTime<Utc>,
}

impl TryFrom<UnlockedPillarRow> for UnlockedPillar {
    type Error = DomainError;

    fn try_from(row: UnlockedPillarRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            module_id: row.module_id,
            pillar: row.pillar.parse::<Pillar>().map_err(DomainError::Repository)?,
            unlocked_at: row.unlocked_at,
        })
    }
}

// ============================================
// Reads
// ============================================

#[async_trait]
impl ProgressRepository for PgProgressRepository {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError> {
        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_module_progress(
        &self,
        user_id: Uuid,
        module_id: &str,
    ) -> Result<Option<ModuleProgress>, DomainError> {
        let row = sqlx::query_as::<_, ModuleProgressRow>(
            "SELECT * FROM module_progress WHERE user_id = $1 AND module_id = $2",
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_module_progress(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ModuleProgress>, DomainError> {
        let rows = sqlx::query_as::<_, ModuleProgressRow>(
            r#"
            SELECT mp.* FROM module_progress mp
            INNER JOIN modules m ON m.id = mp.module_id
            WHERE mp.user_id = $1
            ORDER BY m.sort_order
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_mission_progress(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MissionProgress>, DomainError> {
        let rows = sqlx::query_as::<_, MissionProgressRow>(
            "SELECT * FROM mission_progress WHERE user_id = $1 ORDER BY started_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_streaks(&self, user_id: Uuid) -> Result<Vec<Streak>, DomainError> {
        let rows = sqlx::query_as::<_, StreakRow>(
            "SELECT * FROM streaks WHERE user_id = $1 ORDER BY module_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_declarations(
        &self,
        user_id: Uuid,
        filter: &DeclarationFilter,
    ) -> Result<Vec<Declaration>, DomainError> {
        let rows = sqlx::query_as::<_, DeclarationRow>(
            r#"
            SELECT * FROM declarations
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR module_id = $2)
              AND ($3::TEXT IS NULL OR pillar = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.module_id.as_deref())
        .bind(filter.pillar.map(|p| p.to_string()))
        .bind(filter.created_since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_unlocked_pillars(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UnlockedPillar>, DomainError> {
        let rows = sqlx::query_as::<_, UnlockedPillarRow>(
            "SELECT * FROM unlocked_pillars WHERE user_id = $1 ORDER BY unlocked_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn begin(&self) -> Result<Box<dyn ProgressTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(Box::new(PgProgressTransaction { tx }))
    }
}

// ============================================
// Transaction
// ============================================

/// Open database transaction; rolled back by sqlx when dropped uncommitted
pub struct PgProgressTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ProgressTransaction for PgProgressTransaction {
    async fn lock_profile(
        &mut self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Profile, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, created_at, updated_at)
            VALUES ($1, $2, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(now)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT * FROM profiles WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn save_profile(&mut self, profile: &Profile) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET experience_points = $2, level = $3, updated_at = $4
            WHERE user_id = $1
            "#,
        )
        .bind(profile.user_id)
        .bind(profile.experience_points)
        .bind(profile.level)
        .bind(profile.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn lock_module_progress(
        &mut self,
        user_id: Uuid,
        module_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ModuleProgress, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO module_progress (user_id, module_id, last_activity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, module_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(module_id)
        .bind(now)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let row = sqlx::query_as::<_, ModuleProgressRow>(
            "SELECT * FROM module_progress WHERE user_id = $1 AND module_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn save_module_progress(
        &mut self,
        progress: &ModuleProgress,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE module_progress
            SET state = $3, experience_points = $4, last_activity = $5
            WHERE user_id = $1 AND module_id = $2
            "#,
        )
        .bind(progress.user_id)
        .bind(&progress.module_id)
        .bind(progress.state.to_string())
        .bind(progress.experience_points)
        .bind(progress.last_activity)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn lock_mission_progress(
        &mut self,
        user_id: Uuid,
        mission_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<MissionProgress, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO mission_progress (user_id, mission_id, started_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, mission_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(mission_id)
        .bind(now)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let row = sqlx::query_as::<_, MissionProgressRow>(
            "SELECT * FROM mission_progress WHERE user_id = $1 AND mission_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(mission_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn save_mission_progress(
        &mut self,
        progress: &MissionProgress,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE mission_progress
            SET state = $3, completed_at = $4
            WHERE user_id = $1 AND mission_id = $2
            "#,
        )
        .bind(progress.user_id)
        .bind(progress.mission_id)
        .bind(progress.state.to_string())
        .bind(progress.completed_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn lock_streak(
        &mut self,
        user_id: Uuid,
        module_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Streak, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO streaks (user_id, module_id, last_activity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, module_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(module_id)
        .bind(now)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let row = sqlx::query_as::<_, StreakRow>(
            "SELECT * FROM streaks WHERE user_id = $1 AND module_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn save_streak(&mut self, streak: &Streak) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE streaks
            SET current_streak = $3, longest_streak = $4, last_activity = $5
            WHERE user_id = $1 AND module_id = $2
            "#,
        )
        .bind(streak.user_id)
        .bind(&streak.module_id)
        .bind(streak.current_streak)
        .bind(streak.longest_streak)
        .bind(streak.last_activity)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn insert_declaration(
        &mut self,
        declaration: &Declaration,
    ) -> Result<Declaration, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO declarations
                (id, user_id, module_id, pillar, text, created_at, updated_at, synced)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, module_id, pillar, text) DO NOTHING
            "#,
        )
        .bind(declaration.id)
        .bind(declaration.user_id)
        .bind(&declaration.module_id)
        .bind(declaration.pillar.to_string())
        .bind(&declaration.text)
        .bind(declaration.created_at)
        .bind(declaration.updated_at)
        .bind(declaration.synced)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let row = sqlx::query_as::<_, DeclarationRow>(
            r#"
            SELECT * FROM declarations
            WHERE user_id = $1 AND module_id = $2 AND pillar = $3 AND text = $4
            "#,
        )
        .bind(declaration.user_id)
        .bind(&declaration.module_id)
        .bind(declaration.pillar.to_string())
        .bind(&declaration.text)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn count_other_declarations(
        &mut self,
        declaration: &Declaration,
    ) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM declarations
            WHERE user_id = $1 AND module_id = $2 AND pillar = $3 AND id <> $4
            "#,
        )
        .bind(declaration.user_id)
        .bind(&declaration.module_id)
        .bind(declaration.pillar.to_string())
        .bind(declaration.id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))
    }

    async fn insert_unlocked_pillar(
        &mut self,
        pillar: &UnlockedPillar,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO unlocked_pillars (id, user_id, module_id, pillar, unlocked_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, module_id, pillar) DO NOTHING
            "#,
        )
        .bind(pillar.id)
        .bind(pillar.user_id)
        .bind(&pillar.module_id)
        .bind(pillar.pillar.to_string())
        .bind(pillar.unlocked_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let PgProgressTransaction { tx } = *self;
        tx.commit()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))
    }
}
