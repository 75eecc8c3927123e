//! Session-scoped state and the store that keys it by widget identity.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use questboard_core::clock::Clock;
use questboard_core::error::DomainError;
use questboard_core::response::ResponseRecord;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::channel::ResponseChannel;
use crate::ledger::DedupLedger;
use crate::render_loop::LoopState;

/// Opaque identity of one logical widget instance.
///
/// Re-renders carrying the same key reuse the same ledger and channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Validates a raw key.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the key is empty or blank.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DomainError::Validation(
                "session key must not be empty".to_owned(),
            ));
        }
        Ok(Self(raw))
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the render loop needs for one widget session.
///
/// Only the render loop mutates a context, and only after every handler of
/// the current batch has returned.
#[derive(Debug)]
pub struct SessionContext {
    pub(crate) key: SessionKey,
    pub(crate) ledger: DedupLedger,
    pub(crate) channel: ResponseChannel,
    pub(crate) state: LoopState,
    pub(crate) opened_at: DateTime<Utc>,
    pub(crate) last_active_at: DateTime<Utc>,
}

impl SessionContext {
    /// Creates an empty, idle session.
    #[must_use]
    pub fn new(key: SessionKey, now: DateTime<Utc>) -> Self {
        Self {
            key,
            ledger: DedupLedger::new(),
            channel: ResponseChannel::new(),
            state: LoopState::Idle,
            opened_at: now,
            last_active_at: now,
        }
    }

    /// The session identity key.
    #[must_use]
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Ids handled so far in this session.
    #[must_use]
    pub fn ledger(&self) -> &DedupLedger {
        &self.ledger
    }

    /// The response channel of the most recent dispatching cycle.
    #[must_use]
    pub fn channel(&self) -> &ResponseChannel {
        &self.channel
    }

    /// Shorthand for the current outbox records.
    #[must_use]
    pub fn responses(&self) -> &[ResponseRecord] {
        self.channel.records()
    }

    /// Where the render loop currently stands.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// When the session was opened.
    #[must_use]
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// When the last cycle finished.
    #[must_use]
    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }

    pub(crate) fn transition(&mut self, next: LoopState) {
        debug!(session = %self.key, from = ?self.state, to = ?next, "render loop transition");
        self.state = next;
    }
}

/// Shared handle to one session. Holding the lock makes the holder the
/// session's single driver.
pub type SharedSession = Arc<Mutex<SessionContext>>;

/// Registry of live sessions keyed by widget identity.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionKey, SharedSession>>>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Returns the session for `key`, opening a fresh one if none exists.
    ///
    /// Opening counts as activity: an existing session has its
    /// `last_active_at` refreshed before the map lock is released, so the
    /// idle sweep cannot evict it between `open` and the caller's cycle.
    pub async fn open(&self, key: &SessionKey) -> SharedSession {
        if let Some(session) = self.sessions.read().await.get(key) {
            self.touch(session);
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(key.clone()).or_insert_with(|| {
            info!(session = %key, "opening quest board session");
            Arc::new(Mutex::new(SessionContext::new(
                key.clone(),
                self.clock.now(),
            )))
        });
        self.touch(session);
        Arc::clone(session)
    }

    /// Marks a session active. A session whose lock is held is mid-cycle and
    /// already exempt from eviction.
    fn touch(&self, session: &SharedSession) {
        if let Ok(mut ctx) = session.try_lock() {
            ctx.last_active_at = self.clock.now();
        }
    }

    /// Returns the session for `key` if it is live.
    pub async fn get(&self, key: &SessionKey) -> Option<SharedSession> {
        self.sessions.read().await.get(key).cloned()
    }

    /// Ends a session, discarding its ledger and channel.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` if no session exists for `key`.
    pub async fn end(&self, key: &SessionKey) -> Result<(), DomainError> {
        match self.sessions.write().await.remove(key) {
            Some(_) => {
                info!(session = %key, "quest board session ended");
                Ok(())
            }
            None => Err(DomainError::SessionNotFound(key.to_string())),
        }
    }

    /// Discards sessions that have been idle for longer than `max_idle`.
    ///
    /// Sessions whose lock is held are mid-cycle and are never evicted.
    /// Returns the evicted keys.
    pub async fn evict_idle(&self, max_idle: Duration) -> Vec<SessionKey> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<SessionKey> = sessions
            .iter()
            .filter(|(_, session)| {
                session.try_lock().is_ok_and(|ctx| {
                    self.clock.elapsed_since(ctx.last_active_at) > max_idle
                })
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            sessions.remove(key);
            info!(session = %key, "evicted idle quest board session");
        }
        expired
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no session is live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
