//! Playback driver - Timed navigation over a replay engine.
//!
//! The driver is cooperative and single threaded. The host calls
//! [`PlaybackDriver::poll`] from its event loop; each due timer handler runs
//! to completion before the next one starts. Two timers exist:
//!
//! - the play timer, armed only while playing, which advances one step per
//!   animation interval and stops at the end of the log;
//! - the highlight timer, always armed, which clears the highlight left by a
//!   swap once its animation has had time to finish, even when paused.

use std::collections::BTreeSet;
use std::time::Duration;

use super::{Clock, IntervalTimer};
use crate::replay::{DataState, ReplayEngine, ReplayError};
use crate::schema::{ConfigError, Operation, PlaybackConfig};

/// Auto-play state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

/// How the presenter should transition to a new snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderHint {
    /// Animate over the given duration.
    Animated(Duration),
    /// Snap to the new state; steps are arriving faster than animations finish.
    Instant,
}

impl RenderHint {
    pub fn duration(&self) -> Duration {
        match self {
            RenderHint::Animated(duration) => *duration,
            RenderHint::Instant => Duration::ZERO,
        }
    }
}

/// Consumer of snapshots, such as an SVG or terminal view.
pub trait Presenter {
    /// Draw `state`, reached at log `position`.
    fn render(&mut self, state: &DataState, position: usize, hint: RenderHint);

    /// A fatal replay error halted navigation.
    fn fatal(&mut self, _error: &ReplayError) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Play,
    Highlight,
}

/// Owns a replay engine and drives it from commands and timers.
pub struct PlaybackDriver<C: Clock, P: Presenter> {
    engine: ReplayEngine,
    config: PlaybackConfig,
    clock: C,
    presenter: P,
    state: PlaybackState,
    play_timer: Option<IntervalTimer>,
    highlight_timer: IntervalTimer,
    /// Clock time of the last seek that moved the cursor.
    last_applied_at: Option<Duration>,
    /// Set by a fatal error; navigation refuses to continue afterwards.
    halted: Option<ReplayError>,
}

impl<C: Clock, P: Presenter> PlaybackDriver<C, P> {
    /// Create a stopped driver and render the initial state.
    pub fn new(
        engine: ReplayEngine,
        config: PlaybackConfig,
        clock: C,
        presenter: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let highlight_timer = IntervalTimer::start(clock.now(), config.highlight_poll_interval());
        let mut driver = Self {
            engine,
            config,
            clock,
            presenter,
            state: PlaybackState::Stopped,
            play_timer: None,
            highlight_timer,
            last_applied_at: None,
            halted: None,
        };
        driver.render(RenderHint::Animated(driver.config.animation_duration()));
        Ok(driver)
    }

    /// Move to `target` (clamped) and render. Does not affect auto-play.
    pub fn seek_to(&mut self, target: i64) -> Result<(), ReplayError> {
        self.ensure_not_halted()?;

        let now = self.clock.now();
        let hint = self.render_hint(now);
        let origin = self.engine.position();
        let result = self.engine.seek(target);

        if self.engine.position() != origin {
            self.last_applied_at = Some(now);
        }

        match result {
            Ok(_) => {
                self.render(hint);
                Ok(())
            }
            Err(err) => {
                self.render(RenderHint::Instant);
                Err(self.fail(err))
            }
        }
    }

    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        self.seek_to(self.engine.position() as i64 + 1)
    }

    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        self.seek_to(self.engine.position() as i64 - 1)
    }

    pub fn reset(&mut self) -> Result<(), ReplayError> {
        self.seek_to(0)
    }

    /// Start auto-play. A no-op while already playing.
    pub fn play(&mut self) -> Result<(), ReplayError> {
        self.ensure_not_halted()?;
        if self.state == PlaybackState::Playing {
            return Ok(());
        }

        // Flip the flag before arming so a re-entrant play sees Playing.
        self.state = PlaybackState::Playing;
        self.play_timer = Some(IntervalTimer::start(
            self.clock.now(),
            self.config.animation_duration(),
        ));
        log::info!("playback started at position {}", self.engine.position());
        Ok(())
    }

    /// Stop auto-play and cancel the pending tick.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.stop();
        log::info!("playback paused at position {}", self.engine.position());
    }

    pub fn toggle_play(&mut self) -> Result<(), ReplayError> {
        match self.state {
            PlaybackState::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackState::Stopped => self.play(),
        }
    }

    /// Fire every timer that is due, earliest first.
    pub fn poll(&mut self) -> Result<(), ReplayError> {
        let now = self.clock.now();

        let mut due: Vec<(Duration, TimerKind)> = Vec::with_capacity(2);
        if let Some(timer) = self.play_timer.as_ref().filter(|t| t.is_due(now)) {
            due.push((timer.next_due(), TimerKind::Play));
        }
        if self.highlight_timer.is_due(now) {
            due.push((self.highlight_timer.next_due(), TimerKind::Highlight));
        }
        due.sort_by_key(|(at, _)| *at);

        for (_, kind) in due {
            match kind {
                TimerKind::Play => {
                    // An earlier handler may have cancelled playback.
                    let Some(timer) = self.play_timer.as_mut() else {
                        continue;
                    };
                    timer.fire(now);
                    self.play_tick()?;
                }
                TimerKind::Highlight => {
                    self.highlight_timer.fire(now);
                    // Nothing renders after `Presenter::fatal`.
                    if self.halted.is_none() {
                        self.clear_stale_highlight(now);
                    }
                }
            }
        }
        Ok(())
    }

    /// Earliest time at which `poll` has work to do.
    pub fn next_deadline(&self) -> Duration {
        let highlight = self.highlight_timer.next_due();
        match &self.play_timer {
            Some(timer) => timer.next_due().min(highlight),
            None => highlight,
        }
    }

    #[inline]
    pub fn snapshot(&self) -> &DataState {
        self.engine.snapshot()
    }

    #[inline]
    pub fn focused(&self) -> &BTreeSet<usize> {
        self.engine.focused()
    }

    #[inline]
    pub fn current_position(&self) -> usize {
        self.engine.position()
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    #[inline]
    pub fn playback_state(&self) -> PlaybackState {
        self.state
    }

    pub fn engine(&self) -> &ReplayEngine {
        &self.engine
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn last_applied_operation(&self) -> Option<&Operation> {
        self.engine.last_applied()
    }

    pub fn last_applied_at(&self) -> Option<Duration> {
        self.last_applied_at
    }

    /// The fatal error that halted navigation, if any.
    pub fn halted(&self) -> Option<&ReplayError> {
        self.halted.as_ref()
    }

    fn play_tick(&mut self) -> Result<(), ReplayError> {
        if self.engine.is_at_end() {
            self.stop();
            log::info!("playback reached end of log");
            return Ok(());
        }

        log::debug!("play tick at position {}", self.engine.position());
        self.step_forward()?;

        if self.engine.is_at_end() {
            self.stop();
            log::info!("playback reached end of log");
        }
        Ok(())
    }

    fn clear_stale_highlight(&mut self, now: Duration) {
        let Some(at) = self.last_applied_at else {
            return;
        };
        let after_swap = self.engine.last_applied().is_some_and(Operation::is_swap);
        if after_swap
            && now.saturating_sub(at) >= self.config.animation_duration()
            && self.engine.clear_focus()
        {
            log::debug!("cleared swap highlight at position {}", self.engine.position());
            self.render(RenderHint::Animated(self.config.animation_duration()));
        }
    }

    fn render_hint(&self, now: Duration) -> RenderHint {
        match self.last_applied_at {
            Some(at) if now.saturating_sub(at) <= self.config.animate_threshold() => {
                RenderHint::Instant
            }
            _ => RenderHint::Animated(self.config.animation_duration()),
        }
    }

    fn render(&mut self, hint: RenderHint) {
        self.presenter
            .render(self.engine.snapshot(), self.engine.position(), hint);
    }

    fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.play_timer = None;
    }

    fn ensure_not_halted(&self) -> Result<(), ReplayError> {
        match &self.halted {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn fail(&mut self, err: ReplayError) -> ReplayError {
        log::warn!("replay failed: {err}");
        self.stop();
        if err.is_fatal() {
            self.halted = Some(err.clone());
            self.presenter.fatal(&err);
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::ManualClock;
    use crate::replay::OperationLog;
    use crate::trace::heap_sort_trace;

    #[derive(Debug, Clone, PartialEq)]
    struct Frame {
        position: usize,
        values: Vec<i64>,
        focused: Vec<usize>,
        hint: RenderHint,
    }

    #[derive(Default)]
    struct RecordingPresenter {
        frames: Vec<Frame>,
        fatal: Vec<ReplayError>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, state: &DataState, position: usize, hint: RenderHint) {
            self.frames.push(Frame {
                position,
                values: state.values(),
                focused: state.focused().iter().copied().collect(),
                hint,
            });
        }

        fn fatal(&mut self, error: &ReplayError) {
            self.fatal.push(error.clone());
        }
    }

    fn driver(ops: Vec<Operation>) -> (PlaybackDriver<ManualClock, RecordingPresenter>, ManualClock) {
        driver_for(OperationLog::new(ops).unwrap())
    }

    fn driver_for(log: OperationLog) -> (PlaybackDriver<ManualClock, RecordingPresenter>, ManualClock) {
        let clock = ManualClock::new();
        let engine = ReplayEngine::new(log).unwrap();
        let driver = PlaybackDriver::new(
            engine,
            PlaybackConfig::default(),
            clock.clone(),
            RecordingPresenter::default(),
        )
        .unwrap();
        (driver, clock)
    }

    fn last_frame<C: Clock>(driver: &PlaybackDriver<C, RecordingPresenter>) -> &Frame {
        driver.presenter().frames.last().unwrap()
    }

    const ANIMATED: RenderHint = RenderHint::Animated(Duration::from_millis(500));

    #[test]
    fn test_initial_render() {
        let (driver, _) = driver(vec![Operation::Init { values: vec![3, 1] }]);
        assert_eq!(driver.presenter().frames.len(), 1);
        assert_eq!(last_frame(&driver).values, vec![3, 1]);
        assert_eq!(last_frame(&driver).hint, ANIMATED);
        assert!(!driver.is_playing());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let log = OperationLog::new(vec![Operation::Init { values: vec![] }]).unwrap();
        let config = PlaybackConfig {
            animation_duration_ms: 0,
            render_margin_ms: 0,
            ..Default::default()
        };
        let result = PlaybackDriver::new(
            ReplayEngine::new(log).unwrap(),
            config,
            ManualClock::new(),
            RecordingPresenter::default(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidAnimationDuration)));
    }

    #[test]
    fn test_play_runs_to_end_and_stops() {
        let (mut driver, clock) = driver_for(heap_sort_trace(&[2, 1]));
        let last = driver.engine().log().last_position();

        driver.play().unwrap();
        assert!(driver.is_playing());

        clock.advance_ms(499);
        driver.poll().unwrap();
        assert_eq!(driver.current_position(), 0);

        clock.advance_ms(1);
        driver.poll().unwrap();
        assert_eq!(driver.current_position(), 1);

        for _ in 1..last {
            clock.advance_ms(500);
            driver.poll().unwrap();
        }
        assert_eq!(driver.current_position(), last);
        assert!(!driver.is_playing());
        assert_eq!(driver.snapshot().values(), vec![1, 2]);

        clock.advance_ms(500);
        driver.poll().unwrap();
        assert_eq!(driver.current_position(), last);
    }

    #[test]
    fn test_play_at_end_stops_on_first_tick() {
        let (mut driver, clock) = driver_for(heap_sort_trace(&[2, 1]));
        driver.seek_to(i64::MAX).unwrap();
        let position = driver.current_position();

        driver.play().unwrap();
        clock.advance_ms(500);
        driver.poll().unwrap();
        assert!(!driver.is_playing());
        assert_eq!(driver.current_position(), position);
    }

    #[test]
    fn test_double_play_schedules_once() {
        let (mut driver, clock) = driver_for(heap_sort_trace(&[3, 1, 2]));

        driver.play().unwrap();
        clock.advance_ms(250);
        driver.play().unwrap();
        clock.advance_ms(250);
        driver.poll().unwrap();
        assert_eq!(driver.current_position(), 1);

        clock.advance_ms(250);
        driver.poll().unwrap();
        assert_eq!(driver.current_position(), 1);
    }

    #[test]
    fn test_pause_cancels_timer() {
        let (mut driver, clock) = driver_for(heap_sort_trace(&[3, 1, 2]));

        driver.play().unwrap();
        clock.advance_ms(500);
        driver.poll().unwrap();
        assert_eq!(driver.current_position(), 1);

        driver.pause();
        assert!(!driver.is_playing());
        for _ in 0..4 {
            clock.advance_ms(500);
            driver.poll().unwrap();
        }
        assert_eq!(driver.current_position(), 1);
    }

    #[test]
    fn test_toggle_play() {
        let (mut driver, _) = driver_for(heap_sort_trace(&[3, 1, 2]));
        driver.toggle_play().unwrap();
        assert_eq!(driver.playback_state(), PlaybackState::Playing);
        driver.toggle_play().unwrap();
        assert_eq!(driver.playback_state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_manual_navigation_keeps_playing() {
        let (mut driver, clock) = driver_for(heap_sort_trace(&[3, 1, 2, 5]));

        driver.play().unwrap();
        driver.step_forward().unwrap();
        driver.step_forward().unwrap();
        driver.step_backward().unwrap();
        assert!(driver.is_playing());
        assert_eq!(driver.current_position(), 1);

        clock.advance_ms(500);
        driver.poll().unwrap();
        assert_eq!(driver.current_position(), 2);

        driver.reset().unwrap();
        assert!(driver.is_playing());
        assert_eq!(driver.current_position(), 0);
    }

    #[test]
    fn test_render_hint_follows_elapsed_time() {
        let (mut driver, clock) = driver_for(heap_sort_trace(&[4, 3, 2, 1]));

        driver.step_forward().unwrap();
        assert_eq!(last_frame(&driver).hint, ANIMATED);

        clock.advance_ms(10);
        driver.step_forward().unwrap();
        assert_eq!(last_frame(&driver).hint, RenderHint::Instant);

        clock.advance_ms(460);
        driver.step_forward().unwrap();
        assert_eq!(last_frame(&driver).hint, ANIMATED);

        clock.advance_ms(450);
        driver.step_forward().unwrap();
        assert_eq!(last_frame(&driver).hint, RenderHint::Instant);
        assert_eq!(RenderHint::Instant.duration(), Duration::ZERO);
    }

    #[test]
    fn test_seek_without_movement_keeps_timestamp() {
        let (mut driver, clock) = driver(vec![
            Operation::Init { values: vec![2, 1] },
            Operation::Swap {
                first: 0,
                second: 1,
            },
        ]);
        driver.step_forward().unwrap();
        let stamped = driver.last_applied_at();

        clock.advance_ms(100);
        driver.step_forward().unwrap();
        assert_eq!(driver.last_applied_at(), stamped);
        assert_eq!(last_frame(&driver).hint, RenderHint::Instant);
    }

    #[test]
    fn test_swap_highlight_clears_after_animation() {
        let (mut driver, clock) = driver(vec![
            Operation::Init { values: vec![2, 1] },
            Operation::Swap {
                first: 0,
                second: 1,
            },
        ]);

        driver.step_forward().unwrap();
        assert_eq!(driver.focused().len(), 2);
        assert!(driver.last_applied_operation().is_some_and(Operation::is_swap));

        for _ in 0..4 {
            clock.advance_ms(100);
            driver.poll().unwrap();
        }
        assert_eq!(driver.focused().len(), 2);

        let frames = driver.presenter().frames.len();
        clock.advance_ms(100);
        driver.poll().unwrap();
        assert!(driver.focused().is_empty());
        assert_eq!(driver.presenter().frames.len(), frames + 1);
        assert!(last_frame(&driver).focused.is_empty());
        assert_eq!(driver.snapshot().values(), vec![1, 2]);

        // Nothing left to clear; no further renders.
        clock.advance_ms(100);
        driver.poll().unwrap();
        assert_eq!(driver.presenter().frames.len(), frames + 1);
    }

    #[test]
    fn test_focus_highlight_persists() {
        let (mut driver, clock) = driver(vec![
            Operation::Init { values: vec![2, 1] },
            Operation::Focus {
                first: 0,
                second: 1,
            },
        ]);

        driver.step_forward().unwrap();
        for _ in 0..20 {
            clock.advance_ms(100);
            driver.poll().unwrap();
        }
        assert_eq!(driver.focused().iter().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_range_error_stops_playback() {
        let (mut driver, clock) = driver(vec![
            Operation::Init { values: vec![1, 2] },
            Operation::ChangeActiveLength { step: -3 },
        ]);

        driver.play().unwrap();
        clock.advance_ms(500);
        let err = driver.poll().unwrap_err();
        assert!(matches!(err, ReplayError::ActiveLengthOutOfRange { .. }));
        assert!(!driver.is_playing());
        assert_eq!(driver.current_position(), 0);
        assert!(driver.halted().is_none());
        assert!(driver.presenter().fatal.is_empty());

        driver.reset().unwrap();
    }

    #[test]
    fn test_fatal_error_halts_navigation() {
        let (mut driver, _) = driver(vec![
            Operation::Init { values: vec![1, 2] },
            Operation::Swap {
                first: 0,
                second: 1,
            },
            Operation::Init { values: vec![7] },
        ]);

        driver.seek_to(2).unwrap();
        let err = driver.seek_to(0).unwrap_err();
        assert!(matches!(err, ReplayError::InvariantViolation { .. }));
        assert_eq!(driver.presenter().fatal, vec![err.clone()]);
        assert_eq!(driver.halted(), Some(&err));

        assert_eq!(driver.step_forward(), Err(err.clone()));
        assert_eq!(driver.play(), Err(err));
        assert_eq!(driver.current_position(), 2);
        assert_eq!(driver.snapshot().values(), vec![7]);
    }

    #[test]
    fn test_halted_driver_stops_rendering() {
        let (mut driver, clock) = driver(vec![
            Operation::Init { values: vec![2, 1] },
            Operation::Swap {
                first: 0,
                second: 1,
            },
        ]);
        driver.step_forward().unwrap();
        assert_eq!(driver.focused().len(), 2);

        let err = ReplayError::InvariantViolation {
            position: 1,
            reason: "corrupt".to_string(),
        };
        driver.fail(err.clone());
        assert_eq!(driver.halted(), Some(&err));

        let frames = driver.presenter().frames.len();
        clock.advance_ms(1_000);
        driver.poll().unwrap();
        assert_eq!(driver.presenter().frames.len(), frames);
        assert_eq!(driver.focused().len(), 2);
        assert!(driver.next_deadline() > clock.now());
    }

    #[test]
    fn test_next_deadline() {
        let (mut driver, clock) = driver_for(heap_sort_trace(&[3, 1, 2]));
        assert_eq!(driver.next_deadline(), Duration::from_millis(100));

        clock.advance_ms(100);
        driver.poll().unwrap();
        assert_eq!(driver.next_deadline(), Duration::from_millis(200));

        driver.play().unwrap();
        assert_eq!(driver.next_deadline(), Duration::from_millis(200));
        clock.advance_ms(150);
        driver.poll().unwrap();
        assert_eq!(driver.next_deadline(), Duration::from_millis(300));
    }
}
