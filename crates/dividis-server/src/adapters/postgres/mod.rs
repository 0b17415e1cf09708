//! PostgreSQL Repository Implementations

mod catalog_repository;
mod progress_repository;

pub use catalog_repository::PgCatalogRepository;
pub use progress_repository::{PgProgressRepository, PgProgressTransaction};
