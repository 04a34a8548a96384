//! Trace generation for the replay engine.
//!
//! A [`TraceRecorder`] captures the steps of an algorithm as an
//! [`OperationLog`](crate::replay::OperationLog); [`heap_sort_trace`] uses it
//! to produce the heap sort traces the visualizer was built around.

mod heap_sort;
mod recorder;

pub use heap_sort::heap_sort_trace;
pub use recorder::{TraceRecorder, TraceStats};
