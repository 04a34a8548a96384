//! Errors raised while building or replaying an operation log.

/// Replay errors.
///
/// `EmptyLog` and `InvariantViolation` are fatal: the log itself is
/// malformed and navigation should halt. The range errors abort a single
/// step and leave the state as of the last applied operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("Operation log must contain at least one operation")]
    EmptyLog,
    #[error(
        "Operation {position} would move active length {current} by {step} outside [0, {len}]"
    )]
    ActiveLengthOutOfRange {
        position: usize,
        current: usize,
        step: i64,
        len: usize,
    },
    #[error("Operation {position} references index {index} outside sequence of length {len}")]
    IndexOutOfRange {
        position: usize,
        index: usize,
        len: usize,
    },
    #[error("Invariant violated at operation {position}: {reason}")]
    InvariantViolation { position: usize, reason: String },
}

impl ReplayError {
    /// Whether the error means the log cannot be navigated any further.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ReplayError::EmptyLog | ReplayError::InvariantViolation { .. }
        )
    }

    /// Log position of the offending operation, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            ReplayError::EmptyLog => None,
            ReplayError::ActiveLengthOutOfRange { position, .. }
            | ReplayError::IndexOutOfRange { position, .. }
            | ReplayError::InvariantViolation { position, .. } => Some(*position),
        }
    }
}
