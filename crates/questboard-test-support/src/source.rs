//! Test event sources — in-memory `EventSource` implementations for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use questboard_core::event::{EventBatch, InteractionEvent};
use questboard_core::response::{ResponseRecord, ResponseValue};
use questboard_core::source::EventSource;

/// An event source that replays a fixed script of batches, one per render.
/// Once the script is exhausted the last entry is reported again, the way a
/// widget keeps returning its last value until something changes.
#[derive(Debug, Default)]
pub struct ScriptedEventSource {
    script: Vec<Option<EventBatch>>,
    renders: Vec<Vec<ResponseRecord>>,
}

impl ScriptedEventSource {
    /// Create a source that reports `script[n]` on the n-th render.
    #[must_use]
    pub fn new(script: Vec<Option<EventBatch>>) -> Self {
        Self {
            script,
            renders: Vec::new(),
        }
    }

    /// The responses passed to each render so far.
    #[must_use]
    pub fn renders(&self) -> &[Vec<ResponseRecord>] {
        &self.renders
    }
}

#[async_trait]
impl EventSource for ScriptedEventSource {
    async fn render(&mut self, responses: &[ResponseRecord]) -> Option<EventBatch> {
        let pass = self.renders.len();
        self.renders.push(responses.to_vec());
        self.script
            .get(pass)
            .or_else(|| self.script.last())
            .cloned()
            .flatten()
    }
}

/// Behaves like the quest board widget: clicks queue pending events, each
/// render resolves pending events that have a response, and the remaining
/// pending events are reported back.
#[derive(Debug, Default)]
pub struct WidgetSimulator {
    pending: Vec<InteractionEvent>,
    rewards: HashMap<String, ResponseValue>,
    interacted: bool,
    renders: usize,
}

impl WidgetSimulator {
    /// Create a widget nobody has clicked yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a click on `quest`, tagged with `id`.
    pub fn click(&mut self, id: &str, quest: &str) {
        self.interacted = true;
        self.pending.push(InteractionEvent::activated(id, quest));
    }

    /// Ids still waiting for a response.
    #[must_use]
    pub fn pending_ids(&self) -> Vec<&str> {
        self.pending.iter().map(|event| event.id.as_str()).collect()
    }

    /// The value shown for `quest`, if it has been resolved.
    #[must_use]
    pub fn reward_for(&self, quest: &str) -> Option<&ResponseValue> {
        self.rewards.get(quest)
    }

    /// Number of presentation passes so far.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders
    }
}

#[async_trait]
impl EventSource for WidgetSimulator {
    async fn render(&mut self, responses: &[ResponseRecord]) -> Option<EventBatch> {
        self.renders += 1;
        for response in responses {
            if let Some(position) = self.pending.iter().position(|e| e.id == response.id) {
                let resolved = self.pending.remove(position);
                self.rewards.insert(resolved.payload, response.value.clone());
            }
        }

        self.interacted
            .then(|| EventBatch::from_events(&self.pending))
    }
}
