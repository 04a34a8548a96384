//! Replay engine - Reconstructs data state at any position of an operation log.
//!
//! The engine keeps a cursor `p` and the state obtained by applying
//! operations `0..=p`. Seeking forward applies the operations after the
//! cursor in ascending order; seeking backward undoes operations in
//! descending order. Every step is validated before it mutates anything, so
//! a failed seek leaves the state consistent with the cursor.

use std::collections::BTreeSet;

use super::{DataState, OperationLog, ReplayError};
use crate::schema::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Operation-replay state machine.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    log: OperationLog,
    state: DataState,
    position: usize,
    /// Position of the most recently applied (or undone) operation.
    last_applied: Option<usize>,
}

impl ReplayEngine {
    /// Create an engine positioned at 0, with `log[0]` applied to an empty state.
    pub fn new(log: OperationLog) -> Result<Self, ReplayError> {
        let mut engine = Self {
            log,
            state: DataState::default(),
            position: 0,
            last_applied: None,
        };
        engine.apply(0, Direction::Forward)?;
        engine.last_applied = None;
        Ok(engine)
    }

    /// Move the cursor to `target`, clamped into the log.
    ///
    /// Returns how many positions the cursor moved. On error the cursor
    /// stays at the last successfully reached position.
    pub fn seek(&mut self, target: i64) -> Result<usize, ReplayError> {
        let target = self.log.clamp(target);
        let origin = self.position;

        if target > origin {
            for i in origin + 1..=target {
                self.apply(i, Direction::Forward)?;
                self.position = i;
            }
        } else if target < origin {
            for i in (target + 1..=origin).rev() {
                self.apply(i, Direction::Backward)?;
                self.position = i - 1;
            }
            // Landing on a focus step shows that focus, not its pre-state.
            if self.log[target].is_focus() {
                self.apply(target, Direction::Forward)?;
            }
        }

        let applied = origin.abs_diff(target);
        log::debug!(
            "seek {} -> {} ({} operations)",
            origin,
            self.position,
            applied
        );
        Ok(applied)
    }

    /// Seek one position forward.
    pub fn step_forward(&mut self) -> Result<usize, ReplayError> {
        self.seek(self.position as i64 + 1)
    }

    /// Seek one position backward.
    pub fn step_backward(&mut self) -> Result<usize, ReplayError> {
        self.seek(self.position as i64 - 1)
    }

    /// Seek back to the initial position.
    pub fn reset(&mut self) -> Result<usize, ReplayError> {
        self.seek(0)
    }

    #[inline]
    pub fn snapshot(&self) -> &DataState {
        &self.state
    }

    #[inline]
    pub fn focused(&self) -> &BTreeSet<usize> {
        self.state.focused()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.log.last_position()
    }

    /// Operation most recently applied or undone by a seek.
    pub fn last_applied(&self) -> Option<&Operation> {
        self.last_applied.map(|i| &self.log[i])
    }

    /// Drop the transient highlight. Returns whether anything was focused.
    pub(crate) fn clear_focus(&mut self) -> bool {
        let had_focus = !self.state.focused().is_empty();
        self.state.clear_focus();
        had_focus
    }

    fn apply(&mut self, position: usize, direction: Direction) -> Result<(), ReplayError> {
        let op = &self.log[position];
        let state = &mut self.state;

        match op {
            Operation::Init { values } => {
                if direction == Direction::Backward {
                    return Err(ReplayError::InvariantViolation {
                        position,
                        reason: "init operations cannot be undone".to_string(),
                    });
                }
                state.reset(values);
            }
            Operation::Focus { first, second } => {
                state.clear_focus();
                if direction == Direction::Forward {
                    state.focus(&[*first, *second]);
                }
            }
            Operation::Swap { first, second } => {
                let len = state.len();
                for index in [*first, *second] {
                    if index >= len {
                        return Err(ReplayError::IndexOutOfRange {
                            position,
                            index,
                            len,
                        });
                    }
                }
                state.clear_focus();
                if direction == Direction::Forward {
                    state.focus(&[*first, *second]);
                }
                state.swap(*first, *second);
            }
            Operation::ChangeActiveLength { step } => {
                let current = state.active_length();
                let len = state.len();
                let signed = match direction {
                    Direction::Forward => Some(*step),
                    Direction::Backward => step.checked_neg(),
                };
                let next = signed
                    .and_then(|s| (current as i64).checked_add(s))
                    .filter(|next| (0..=len as i64).contains(next));
                let Some(next) = next else {
                    return Err(ReplayError::ActiveLengthOutOfRange {
                        position,
                        current,
                        step: signed.unwrap_or(*step),
                        len,
                    });
                };
                state.clear_focus();
                state.set_active_length(next as usize);
            }
        }

        self.last_applied = Some(position);
        Ok(())
    }
}
