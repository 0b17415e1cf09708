//! PostgreSQL implementation of CatalogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use dividis::{CatalogRepository, DomainError, Mission, MissionFrequency, Module};

/// PostgreSQL implementation of CatalogRepository
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ModuleRow {
    id: String,
    name: String,
    description: String,
    icon: String,
    sort_order: i32,
    xp_required: i32,
}

impl From<ModuleRow> for Module {
    fn from(row: ModuleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            icon: row.icon,
            order: row.sort_order,
            xp_required: row.xp_required,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MissionRow {
    id: Uuid,
    module_id: Option<String>,
    title: String,
    description: String,
    xp_reward: i32,
    required_level: i32,
    frequency: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<MissionRow> for Mission {
    type Error = DomainError;

    fn try_from(row: MissionRow) -> Result<Self, Self::Error> {
        let frequency = row
            .frequency
            .map(|f| f.parse::<MissionFrequency>())
            .transpose()
            .map_err(DomainError::Repository)?;

        Ok(Self {
            id: row.id,
            module_id: row.module_id,
            title: row.title,
            description: row.description,
            xp_reward: row.xp_reward,
            required_level: row.required_level,
            frequency,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn find_module(&self, id: &str) -> Result<Option<Module>, DomainError> {
        let row = sqlx::query_as::<_, ModuleRow>("SELECT * FROM modules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn list_modules(&self) -> Result<Vec<Module>, DomainError> {
        let rows = sqlx::query_as::<_, ModuleRow>("SELECT * FROM modules ORDER BY sort_order")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_mission(&self, id: Uuid) -> Result<Option<Mission>, DomainError> {
        let row = sqlx::query_as::<_, MissionRow>("SELECT * FROM missions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_missions(&self) -> Result<Vec<Mission>, DomainError> {
        let rows = sqlx::query_as::<_, MissionRow>(
            "SELECT * FROM missions ORDER BY module_id NULLS FIRST, created_at, title",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
