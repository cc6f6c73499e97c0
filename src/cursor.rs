//! Circular cursor over generated combinations.

use crate::combination::Combination;

/// Ordered combinations plus the position of the one currently playing.
///
/// Navigation wraps in both directions. An empty sequence is legal: moves are
/// no-ops and [`current`](Self::current) yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinationSequence {
    items: Vec<Combination>,
    idx: usize,
}

impl CombinationSequence {
    pub fn new(items: Vec<Combination>) -> Self {
        Self { items, idx: 0 }
    }

    /// Number of combinations contained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of the current combination, `None` when empty.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.idx)
    }

    #[must_use]
    pub fn current(&self) -> Option<&Combination> {
        self.items.get(self.idx)
    }

    /// Advance, wrapping at the end. Returns the new current combination.
    pub fn next(&mut self) -> Option<&Combination> {
        if self.items.is_empty() {
            return None;
        }
        self.idx = (self.idx + 1) % self.items.len();
        self.current()
    }

    /// Step back, wrapping at the start. Returns the new current combination.
    pub fn previous(&mut self) -> Option<&Combination> {
        if self.items.is_empty() {
            return None;
        }
        let n = self.items.len();
        self.idx = (self.idx + n - 1) % n;
        self.current()
    }

    /// Borrow the internal order (read-only).
    #[must_use]
    pub fn as_slice(&self) -> &[Combination] {
        &self.items
    }
}
