//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod mission_frequency;
mod mission_state;
mod module_state;
mod pillar;

pub use mission_frequency::*;
pub use mission_state::*;
pub use module_state::*;
pub use pillar::*;
