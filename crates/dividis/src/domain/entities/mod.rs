//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Profile: cumulative XP and level of a user
//! - Module / ModuleProgress: thematic areas and their per-user unlock state
//! - Mission / MissionProgress: rewarded tasks and their per-user completion
//! - Streak: consecutive-day activity per (user, module)
//! - Declaration / UnlockedPillar: free-text reflections per pillar

mod declaration;
mod mission;
mod module;
mod profile;
mod streak;

pub use declaration::*;
pub use mission::*;
pub use module::*;
pub use profile::*;
pub use streak::*;
