//! Dedup ledger: the ids of every event already handled in a session.

use std::collections::HashSet;

/// Set of handled event ids. Grows monotonically; there is no removal.
#[derive(Debug, Clone, Default)]
pub struct DedupLedger {
    handled: HashSet<String>,
}

impl DedupLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` has already been handled.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.handled.contains(id)
    }

    /// Records `id` as handled. Returns `false` if it was already present.
    pub fn record(&mut self, id: impl Into<String>) -> bool {
        self.handled.insert(id.into())
    }

    /// Number of handled ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handled.len()
    }

    /// Returns `true` if nothing has been handled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handled.is_empty()
    }

    /// Iterates over handled ids in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.handled.iter().map(String::as_str)
    }
}
