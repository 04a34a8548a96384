//! Trace recorder for capturing algorithm steps as an operation log.

use std::fmt;

use crate::replay::OperationLog;
use crate::schema::Operation;

/// Records operations while mirroring their effect on a working copy.
///
/// Usage:
/// ```ignore
/// let mut recorder = TraceRecorder::new(&[3, 1, 2]);
/// recorder.focus(0, 1);
/// if recorder.data()[0] > recorder.data()[1] {
///     recorder.swap(0, 1);
/// }
/// let log = recorder.finish();
/// ```
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    operations: Vec<Operation>,
    data: Vec<i64>,
    active_length: usize,
    stats: TraceStats,
}

impl TraceRecorder {
    /// Start a trace with an `Init` of `values`.
    pub fn new(values: &[i64]) -> Self {
        Self {
            operations: vec![Operation::Init {
                values: values.to_vec(),
            }],
            data: values.to_vec(),
            active_length: values.len(),
            stats: TraceStats::default(),
        }
    }

    /// Working copy of the sequence after the recorded operations.
    #[inline]
    pub fn data(&self) -> &[i64] {
        &self.data
    }

    #[inline]
    pub fn active_length(&self) -> usize {
        self.active_length
    }

    /// Record a highlight of two positions.
    pub fn focus(&mut self, first: usize, second: usize) {
        self.operations.push(Operation::Focus { first, second });
        self.stats.focuses += 1;
    }

    /// Record a swap and apply it to the working copy.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, first: usize, second: usize) {
        self.data.swap(first, second);
        self.operations.push(Operation::Swap { first, second });
        self.stats.swaps += 1;
    }

    /// Record a change of the active length.
    ///
    /// # Panics
    /// Panics if the active length would leave `[0, len]`.
    pub fn change_active_length(&mut self, step: i64) {
        let next = self.active_length as i64 + step;
        assert!(
            (0..=self.data.len() as i64).contains(&next),
            "active length {} + {} out of range",
            self.active_length,
            step
        );
        self.active_length = next as usize;
        self.operations
            .push(Operation::ChangeActiveLength { step });
        self.stats.length_changes += 1;
    }

    /// Number of operations recorded so far, including the initial `Init`.
    pub fn operations_recorded(&self) -> usize {
        self.operations.len()
    }

    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    /// Finalize into an immutable log.
    pub fn finish(self) -> OperationLog {
        log::debug!("trace finished: {}", self.stats);
        OperationLog::from_recorded(self.operations)
    }
}

/// Counts of recorded operations by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub focuses: usize,
    pub swaps: usize,
    pub length_changes: usize,
}

impl fmt::Display for TraceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} focuses, {} swaps, {} active length changes",
            self.focuses, self.swaps, self.length_changes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::ReplayEngine;

    #[test]
    fn test_recorder_tracks_working_copy() {
        let mut recorder = TraceRecorder::new(&[3, 1, 2]);
        recorder.focus(0, 1);
        recorder.swap(0, 1);
        recorder.change_active_length(-1);

        assert_eq!(recorder.data(), &[1, 3, 2]);
        assert_eq!(recorder.active_length(), 2);
        assert_eq!(recorder.operations_recorded(), 4);
        assert_eq!(
            recorder.stats(),
            TraceStats {
                focuses: 1,
                swaps: 1,
                length_changes: 1
            }
        );
    }

    #[test]
    fn test_recorded_log_replays_to_working_copy() {
        let mut recorder = TraceRecorder::new(&[5, 4, 3]);
        recorder.swap(0, 2);
        recorder.change_active_length(-1);
        recorder.swap(0, 1);
        let expected = recorder.data().to_vec();

        let mut engine = ReplayEngine::new(recorder.finish()).unwrap();
        engine.seek(i64::MAX).unwrap();
        assert_eq!(engine.snapshot().values(), expected);
        assert_eq!(engine.snapshot().active_length(), 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_change_active_length_panics_out_of_range() {
        let mut recorder = TraceRecorder::new(&[1]);
        recorder.change_active_length(-2);
    }

    #[test]
    fn test_stats_display() {
        let stats = TraceStats {
            focuses: 3,
            swaps: 2,
            length_changes: 1,
        };
        assert_eq!(
            stats.to_string(),
            "3 focuses, 2 swaps, 1 active length changes"
        );
    }
}
