//! Timed playback of a replay engine.
//!
//! [`PlaybackDriver`] turns navigation commands and timer ticks into seeks,
//! and tells a [`Presenter`] whether each new snapshot should be animated or
//! drawn instantly. Time comes from a [`Clock`], so hosts can plug in a wall
//! clock and tests can use [`ManualClock`].

mod clock;
mod driver;
mod timer;

#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
pub use driver::{PlaybackDriver, PlaybackState, Presenter, RenderHint};
pub use timer::IntervalTimer;
