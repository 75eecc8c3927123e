//! Event handlers for the Rewards context.
//!
//! `QuestRewardHandler` is the production `EventHandler`: it draws a reward
//! factor, waits out the simulated latency of the external reward lookup and
//! answers with the reward amount as text.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use questboard_core::error::HandlerError;
use questboard_core::event::{EventKind, InteractionEvent};
use questboard_core::handler::EventHandler;
use questboard_core::response::ResponseRecord;
use questboard_core::rng::DeterministicRng;
use tracing::{debug, instrument};

use crate::domain::reward::RewardRule;

/// Answers quest activations with the quest's reward.
pub struct QuestRewardHandler {
    rule: RewardRule,
    rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    latency: Duration,
}

impl QuestRewardHandler {
    /// Creates a handler using the default rule and no added latency.
    #[must_use]
    pub fn new(rng: Arc<Mutex<dyn DeterministicRng + Send>>) -> Self {
        Self {
            rule: RewardRule::default(),
            rng,
            latency: Duration::ZERO,
        }
    }

    /// Replaces the reward rule.
    #[must_use]
    pub fn with_rule(mut self, rule: RewardRule) -> Self {
        self.rule = rule;
        self
    }

    /// Delays every answer by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Computes the reward for one activated quest.
    ///
    /// The `Mutex` is locked only around the synchronous draw so the guard is
    /// never held across the latency wait.
    async fn reward_quest(&self, event: InteractionEvent) -> Result<ResponseRecord, HandlerError> {
        let factor = {
            let mut rng_guard = self
                .rng
                .lock()
                .map_err(|e| HandlerError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
            self.rule.draw_factor(&mut *rng_guard)
        };
        let reward = self.rule.reward(&event.payload, factor);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        debug!(quest = %event.payload, factor, reward, "quest reward computed");
        Ok(ResponseRecord::new(event.id, reward.to_string()))
    }
}

#[async_trait]
impl EventHandler for QuestRewardHandler {
    #[instrument(skip_all, fields(event_id = %event.id, kind = %event.kind))]
    async fn handle(
        &self,
        event: InteractionEvent,
    ) -> Result<Option<ResponseRecord>, HandlerError> {
        match event.kind {
            EventKind::Activated => self.reward_quest(event).await.map(Some),
        }
    }
}
