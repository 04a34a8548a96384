//! Replay module - Operation log, data state and the replay engine.

mod engine;
mod error;
mod oplog;
mod state;

pub use engine::ReplayEngine;
pub use error::ReplayError;
pub use oplog::{LoadError, OperationLog};
pub use state::{DataState, Element, ElementKey, ElementMove};
