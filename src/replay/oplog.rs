//! Immutable operation log.

use std::fs;
use std::io;
use std::ops::Index;
use std::path::Path;

use super::ReplayError;
use crate::schema::Operation;

/// Ordered, read-only sequence of recorded operations.
///
/// A log always holds at least one operation, so position 0 is always a
/// valid replay target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationLog {
    operations: Vec<Operation>,
}

impl OperationLog {
    /// Build a log, rejecting an empty operation list.
    pub fn new(operations: Vec<Operation>) -> Result<Self, ReplayError> {
        if operations.is_empty() {
            return Err(ReplayError::EmptyLog);
        }
        Ok(Self { operations })
    }

    /// Recorders always start with an `Init`, so the list is never empty.
    pub(crate) fn from_recorded(operations: Vec<Operation>) -> Self {
        debug_assert!(!operations.is_empty());
        Self { operations }
    }

    /// Parse a log from its JSON array form.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let operations: Vec<Operation> = serde_json::from_str(json)?;
        Ok(Self::new(operations)?)
    }

    /// Read and parse a JSON log file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Number of operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the log has no operations. Never true for a constructed log.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Highest valid position.
    #[inline]
    pub fn last_position(&self) -> usize {
        self.operations.len() - 1
    }

    pub fn get(&self, position: usize) -> Option<&Operation> {
        self.operations.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.operations
    }

    /// Clamp an arbitrary signed target into `[0, last_position]`.
    pub fn clamp(&self, target: i64) -> usize {
        if target <= 0 {
            0
        } else {
            (target as u64).min(self.last_position() as u64) as usize
        }
    }

    /// Numbered labels, one per operation, for an operation selector.
    pub fn labels(&self) -> Vec<String> {
        self.operations
            .iter()
            .enumerate()
            .map(|(i, op)| format!("{i}. {op}"))
            .collect()
    }
}

impl Index<usize> for OperationLog {
    type Output = Operation;

    fn index(&self, position: usize) -> &Operation {
        &self.operations[position]
    }
}

impl<'a> IntoIterator for &'a OperationLog {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

/// Errors from loading a log out of JSON.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read log: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse log: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Replay(#[from] ReplayError),
}
