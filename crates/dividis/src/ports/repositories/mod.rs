//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod catalog_repository;
mod progress_repository;

pub use catalog_repository::*;
pub use progress_repository::*;
