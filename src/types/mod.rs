//! Type definitions

pub mod messages;
pub mod schedule;

pub use messages::*;
pub use schedule::*;
