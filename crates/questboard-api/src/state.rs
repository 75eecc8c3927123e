//! Shared application state.

use std::sync::{Arc, Mutex};

use questboard_core::clock::Clock;
use questboard_core::handler::EventHandler;
use questboard_core::rng::DeterministicRng;
use questboard_rewards::application::event_handlers::QuestRewardHandler;
use questboard_sync::render_loop::RenderLoop;
use questboard_sync::session::SessionStore;

use crate::config::AppConfig;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live widget sessions keyed by session identity.
    pub sessions: SessionStore,
    /// Render loop wired to the event handler.
    pub render_loop: RenderLoop,
    /// Quest names shown on every board.
    pub quests: Arc<[String]>,
}

impl AppState {
    /// Create new application state around an arbitrary handler.
    #[must_use]
    pub fn new(
        handler: Arc<dyn EventHandler>,
        clock: Arc<dyn Clock>,
        quests: Vec<String>,
        max_rerenders: usize,
    ) -> Self {
        Self {
            sessions: SessionStore::new(Arc::clone(&clock)),
            render_loop: RenderLoop::new(handler, clock).with_max_rerenders(max_rerenders),
            quests: quests.into(),
        }
    }

    /// Create application state answering quest clicks with rewards.
    #[must_use]
    pub fn with_rewards(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    ) -> Self {
        let handler = QuestRewardHandler::new(rng).with_latency(config.handler_latency);
        Self::new(
            Arc::new(handler),
            clock,
            config.quests.clone(),
            config.max_rerenders,
        )
    }
}
