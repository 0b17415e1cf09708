//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the progress engines
//! interact with external systems (storage, clock).
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
