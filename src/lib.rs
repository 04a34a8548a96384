//! Heap Trace Replay - Step through recorded heap sort traces.
//!
//! This crate replays an ordered log of array mutations (init, focus, swap,
//! change of active length) so a visualizer can step forward and backward,
//! jump to any position, or auto-play the trace while keeping its drawing in
//! sync with the reconstructed data.
//!
//! # Architecture
//!
//! - `schema`: Operation types and playback configuration
//! - `replay`: Operation log, data state and the replay engine
//! - `playback`: Timers, render gating and the playback driver
//! - `trace`: Recording traces, including a heap sort tracer
//!
//! # Example
//!
//! ```rust,no_run
//! use heap_trace_replay::{
//!     replay::ReplayEngine,
//!     trace::heap_sort_trace,
//! };
//!
//! // Record a heap sort of six values
//! let log = heap_sort_trace(&[1, 3, 4, 0, 2, 5]);
//!
//! // Replay it
//! let mut engine = ReplayEngine::new(log).unwrap();
//! engine.seek(3).unwrap();
//! println!("After step 3: {:?}", engine.snapshot().values());
//!
//! engine.seek(0).unwrap();
//! println!("Back at the start: {:?}", engine.snapshot().values());
//! ```

pub mod playback;
pub mod replay;
pub mod schema;
pub mod trace;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use playback::{PlaybackDriver, Presenter, RenderHint};
pub use replay::{DataState, OperationLog, ReplayEngine, ReplayError};
pub use schema::{Operation, PlaybackConfig};
