//! Schema module - Operation and configuration types for trace playback.

mod config;
mod operation;

pub use config::*;
pub use operation::*;
