//! Dividis Domain Library
//!
//! Core domain types and engines for Dividis progress tracking: experience
//! points and levels, module unlocks, missions, streaks and pillar
//! declarations.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Profile, Module, Mission, Streak, Declaration)
//!   - `value_objects/`: Immutable value types (ModuleState, MissionState, Pillar)
//!   - `errors/`: Domain-specific error types
//!   - `services/`: The progress engine and its unlock policies
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Catalog and progress storage, with a unit of work
//!   - `services/`: Clock
//!
//! # Usage
//!
//! ```rust,ignore
//! use dividis::{ProgressConfig, ProgressEngine, SystemClock};
//!
//! let engine = ProgressEngine::new(catalog, progress, Arc::new(SystemClock), ProgressConfig::default());
//! engine.complete_mission(user_id, &mission_id).await?;
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    level_for, parse_mission_id, Declaration, DeclarationReceipt, DomainError,
    GlobalMissionStatus, Mission, MissionFrequency, MissionKeywords, MissionProgress,
    MissionSelector, MissionState, MissionTarget, Module, ModuleProgress, ModuleState, Pillar,
    Profile, ProgressConfig, ProgressEngine, Streak, UnlockPolicy, UnlockedPillar,
};
pub use ports::{
    CatalogRepository, Clock, DeclarationFilter, ProgressRepository, ProgressTransaction,
    SystemClock,
};
