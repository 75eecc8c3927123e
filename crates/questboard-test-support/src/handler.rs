//! Test handlers — mock `EventHandler` implementations for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use questboard_core::error::HandlerError;
use questboard_core::event::InteractionEvent;
use questboard_core::handler::EventHandler;
use questboard_core::response::ResponseRecord;

/// A handler that records every event it receives and answers with the
/// event's payload echoed back. Payloads listed with `failing_on` are
/// rejected instead, until `recover` is called.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    received: Mutex<Vec<InteractionEvent>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingHandler {
    /// Create a handler that answers every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that rejects events carrying any of `payloads`.
    #[must_use]
    pub fn failing_on(payloads: &[&str]) -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            failing: Mutex::new(payloads.iter().map(|p| (*p).to_owned()).collect()),
        }
    }

    /// Stops rejecting every payload.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Returns a snapshot of all events received, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn received(&self) -> Vec<InteractionEvent> {
        self.received.lock().unwrap().clone()
    }

    /// Number of times an event with `id` was received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls_for(&self, id: &str) -> usize {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.id == id)
            .count()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(
        &self,
        event: InteractionEvent,
    ) -> Result<Option<ResponseRecord>, HandlerError> {
        self.received.lock().unwrap().push(event.clone());
        if self.failing.lock().unwrap().contains(&event.payload) {
            return Err(HandlerError::Rejected {
                event_id: event.id,
                reason: "scripted failure".into(),
            });
        }
        Ok(Some(ResponseRecord::new(event.id, event.payload)))
    }
}

/// A handler that always fails with an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingHandler;

#[async_trait]
impl EventHandler for FailingHandler {
    async fn handle(
        &self,
        _event: InteractionEvent,
    ) -> Result<Option<ResponseRecord>, HandlerError> {
        Err(HandlerError::Infrastructure("connection refused".into()))
    }
}
