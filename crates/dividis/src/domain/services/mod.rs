//! Domain Services
//!
//! The progress engines. [`ProgressEngine`] owns the ports and its
//! operations are split by concern:
//! - `ledger`: XP grants and level recomputation
//! - `streaks`: day-granularity activity streaks
//! - `unlock`: per-module unlock policies, `attempt_unlock` and `sync_all`
//! - `missions`: mission completion and failure
//! - `global_missions`: derived progress of global / recurring missions
//! - `declarations`: first-declaration-per-pillar rewards

mod config;
mod declarations;
mod engine;
mod global_missions;
mod ledger;
mod missions;
mod streaks;
mod unlock;

#[cfg(test)]
mod test_support;

pub use config::*;
pub use declarations::*;
pub use engine::*;
pub use global_missions::*;
pub use unlock::*;
