//! Data state reconstructed by the replay engine.

use std::collections::BTreeSet;

use serde::Serialize;

/// Stable identity of an element, assigned from its position at `Init`.
///
/// Keys travel with their values across swaps, so a renderer can animate a
/// moving value instead of a changing slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ElementKey(pub usize);

/// A value in the visualized sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Element {
    pub value: i64,
    pub key: ElementKey,
}

/// An element that changed slot between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementMove {
    pub key: ElementKey,
    pub from: usize,
    pub to: usize,
}

/// Current snapshot of the sequence, its active prefix and the highlight.
///
/// Invariants: `active_length <= elements.len()` and every focused index is
/// below `elements.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataState {
    elements: Vec<Element>,
    active_length: usize,
    focused: BTreeSet<usize>,
}

impl DataState {
    /// Fresh state with keys derived from positions and everything active.
    pub fn from_values(values: &[i64]) -> Self {
        let mut state = Self::default();
        state.reset(values);
        state
    }

    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Element values in slot order.
    pub fn values(&self) -> Vec<i64> {
        self.elements.iter().map(|e| e.value).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn active_length(&self) -> usize {
        self.active_length
    }

    #[inline]
    pub fn focused(&self) -> &BTreeSet<usize> {
        &self.focused
    }

    #[inline]
    pub fn is_focused(&self, index: usize) -> bool {
        self.focused.contains(&index)
    }

    /// Whether the slot lies in the settled tail.
    #[inline]
    pub fn is_inactive(&self, index: usize) -> bool {
        index >= self.active_length
    }

    /// The active prefix, which a tree view lays out as a binary heap.
    pub fn active_elements(&self) -> &[Element] {
        &self.elements[..self.active_length]
    }

    /// Elements whose slot differs from `previous`, matched by key.
    pub fn moves_since(&self, previous: &DataState) -> Vec<ElementMove> {
        let mut moves = Vec::new();
        for (to, element) in self.elements.iter().enumerate() {
            let Some(from) = previous.elements.iter().position(|e| e.key == element.key) else {
                continue;
            };
            if from != to {
                moves.push(ElementMove {
                    key: element.key,
                    from,
                    to,
                });
            }
        }
        moves
    }

    pub(crate) fn reset(&mut self, values: &[i64]) {
        self.elements = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Element {
                value,
                key: ElementKey(i),
            })
            .collect();
        self.active_length = self.elements.len();
        self.focused.clear();
    }

    pub(crate) fn clear_focus(&mut self) {
        self.focused.clear();
    }

    /// Add indices to the highlight, dropping any outside the sequence.
    pub(crate) fn focus(&mut self, indexes: &[usize]) {
        let len = self.elements.len();
        self.focused
            .extend(indexes.iter().copied().filter(|&i| i < len));
    }

    /// Callers validate both indices beforehand.
    pub(crate) fn swap(&mut self, first: usize, second: usize) {
        self.elements.swap(first, second);
    }

    pub(crate) fn set_active_length(&mut self, active_length: usize) {
        debug_assert!(active_length <= self.elements.len());
        self.active_length = active_length;
    }
}
