//! Response channel: the current cycle's outbox for the widget.

use questboard_core::response::ResponseRecord;

/// Records produced by the most recent dispatching cycle.
///
/// Not a durable log: the render loop resets it at the start of every
/// dispatching phase. Order follows handler completion, so consumers must
/// correlate by id.
#[derive(Debug, Clone, Default)]
pub struct ResponseChannel {
    records: Vec<ResponseRecord>,
}

impl ResponseChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every record.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Appends a record.
    pub fn push(&mut self, record: ResponseRecord) {
        self.records.push(record);
    }

    /// Looks up the record for an event id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ResponseRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// The current records.
    #[must_use]
    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the channel holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
