//! Catalog Repository Port
//!
//! Read-only access to the seeded Module and Mission catalog.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Mission, Module};

/// Repository interface for catalog entities
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Find a Module by its string key
    async fn find_module(&self, id: &str) -> Result<Option<Module>, DomainError>;

    /// All modules, ordered by rank
    async fn list_modules(&self) -> Result<Vec<Module>, DomainError>;

    /// Find a Mission by ID
    async fn find_mission(&self, id: Uuid) -> Result<Option<Mission>, DomainError>;

    /// All missions, module-scoped and global
    async fn list_missions(&self) -> Result<Vec<Mission>, DomainError>;
}
