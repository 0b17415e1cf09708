//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and the HTTP layer.

mod progress_service;

pub use progress_service::{ModuleDetail, ModuleStatus, ProgressOverview, ProgressService};
