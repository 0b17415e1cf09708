//! Dividis API Models
//!
//! Request/response DTOs for the HTTP layer:
//! - Profile and progress aggregates
//! - Modules and their per-user state
//! - Missions, mission progress and global mission status
//! - Declarations and pillar markers

mod declaration;
mod mission;
mod module;
mod progress;

pub use declaration::*;
pub use mission::*;
pub use module::*;
pub use progress::*;
