//! Render loop: poll, dispatch, await all, commit, re-render.
//!
//! One cycle walks `Idle → Dispatching → Committing → (Rerender | Idle)`.
//! Handlers of a batch run as independent tokio tasks and are joined before
//! anything is committed, so a session's ledger and channel only ever change
//! between batches. `RenderLoop::render` runs the whole cycle in a task that
//! owns the session lock, so a caller that stops waiting never strands a
//! batch half way through.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use questboard_core::clock::Clock;
use questboard_core::error::HandlerError;
use questboard_core::event::{EventBatch, InteractionEvent};
use questboard_core::handler::EventHandler;
use questboard_core::response::ResponseRecord;
use questboard_core::source::EventSource;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::dispatcher::select_events_to_handle;
use crate::error::SyncError;
use crate::session::{SessionContext, SharedSession};

/// Default cap on consecutive re-renders within one `drive` call.
pub const DEFAULT_MAX_RERENDERS: usize = 16;

/// Position of a session in the render loop state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// No dispatch in flight.
    Idle,
    /// New events identified, handlers launched.
    Dispatching,
    /// All handlers returned; results being merged.
    Committing,
    /// At least one event was committed; a fresh presentation pass is due.
    Rerender,
}

/// Outcome of one render loop cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Correlation id for this cycle.
    pub cycle_id: Uuid,
    /// Ids handed to the handler, in dispatch order.
    pub dispatched: Vec<String>,
    /// Ids added to the ledger.
    pub committed: usize,
    /// Records appended to the response channel.
    pub responses: usize,
    /// Ids whose handler failed; they stay eligible for a later cycle.
    pub failed: Vec<String>,
    /// Reported entries skipped as malformed.
    pub malformed: usize,
    /// Well-formed entries skipped because their id was already handled.
    pub duplicates: usize,
    /// Whether a fresh presentation pass was triggered.
    pub rerender: bool,
    /// When the cycle finished.
    pub completed_at: DateTime<Utc>,
}

/// Result of `RenderLoop::drive`.
#[derive(Debug, Clone, Default)]
pub struct DriveSummary {
    /// Reports of every cycle run, in order.
    pub cycles: Vec<CycleReport>,
    /// Fresh presentation passes triggered by commits.
    pub rerenders: usize,
}

impl DriveSummary {
    /// Total handler invocations across all cycles.
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.cycles.iter().map(|cycle| cycle.dispatched.len()).sum()
    }
}

/// A cycle report together with the outbox as the cycle left it.
#[derive(Debug, Clone)]
pub struct RenderPass {
    /// What the cycle did.
    pub report: CycleReport,
    /// The response channel contents after the cycle.
    pub responses: Vec<ResponseRecord>,
}

type Outcome = Result<Option<ResponseRecord>, HandlerError>;

/// Orchestrates cycles for any session against one handler.
#[derive(Clone)]
pub struct RenderLoop {
    handler: Arc<dyn EventHandler>,
    clock: Arc<dyn Clock>,
    max_rerenders: usize,
}

impl RenderLoop {
    /// Creates a render loop with the default re-render cap.
    #[must_use]
    pub fn new(handler: Arc<dyn EventHandler>, clock: Arc<dyn Clock>) -> Self {
        Self {
            handler,
            clock,
            max_rerenders: DEFAULT_MAX_RERENDERS,
        }
    }

    /// Overrides the cap on consecutive re-renders per `drive` call.
    #[must_use]
    pub fn with_max_rerenders(mut self, max_rerenders: usize) -> Self {
        self.max_rerenders = max_rerenders;
        self
    }

    /// Runs one cycle for a shared session on its own task.
    ///
    /// The task takes the session lock and runs dispatch and commit to the
    /// end even if the returned future is dropped, so every dispatched id is
    /// either committed or reported as failed. Concurrent renders of the same
    /// session queue on the lock.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::CycleAborted` if the cycle task itself panicked.
    pub async fn render(
        &self,
        session: SharedSession,
        batch: Option<EventBatch>,
    ) -> Result<RenderPass, SyncError> {
        let render_loop = self.clone();
        let task = tokio::spawn(async move {
            let mut ctx = session.lock_owned().await;
            let report = render_loop.run_cycle(&mut ctx, batch.as_ref()).await;
            RenderPass {
                report,
                responses: ctx.responses().to_vec(),
            }
        });

        task.await.map_err(|join_error| SyncError::CycleAborted {
            reason: join_error.to_string(),
        })
    }

    /// Runs one cycle over the events the source reported.
    ///
    /// The returned future must be driven to completion: dropping it while
    /// handlers are in flight discards their results. Callers that may be
    /// cancelled go through `render` instead.
    ///
    /// Malformed entries and already handled ids are skipped. New events are
    /// handled concurrently; once all have returned, successes are committed
    /// to the session and failures are left out of the ledger.
    #[instrument(skip_all, fields(session = %ctx.key(), cycle_id = tracing::field::Empty))]
    pub async fn run_cycle(
        &self,
        ctx: &mut SessionContext,
        batch: Option<&EventBatch>,
    ) -> CycleReport {
        let cycle_id = Uuid::now_v7();
        tracing::Span::current().record("cycle_id", tracing::field::display(cycle_id));

        if ctx.state != LoopState::Idle {
            ctx.transition(LoopState::Idle);
        }

        let parsed = batch.map(EventBatch::parse).unwrap_or_default();
        for malformed in &parsed.malformed {
            warn!(%malformed, "skipping malformed event");
        }

        let to_handle = select_events_to_handle(&parsed.events, &ctx.ledger);
        let duplicates = parsed.events.len() - to_handle.len();
        if duplicates > 0 {
            debug!(duplicates, "ignoring already handled events");
        }

        let mut report = CycleReport {
            cycle_id,
            dispatched: to_handle.iter().map(|event| event.id.clone()).collect(),
            committed: 0,
            responses: 0,
            failed: Vec::new(),
            malformed: parsed.malformed.len(),
            duplicates,
            rerender: false,
            completed_at: self.clock.now(),
        };

        if to_handle.is_empty() {
            ctx.last_active_at = report.completed_at;
            return report;
        }

        ctx.transition(LoopState::Dispatching);
        ctx.channel.reset();
        info!(
            handled = ctx.ledger.len(),
            to_handle = to_handle.len(),
            "dispatching quest board events"
        );

        let outcomes = self.dispatch_all(to_handle).await;

        ctx.transition(LoopState::Committing);
        for (event_id, outcome) in outcomes {
            match outcome {
                Ok(Some(record)) if record.id != event_id => {
                    let err = HandlerError::MismatchedResponse {
                        expected: event_id.clone(),
                        actual: record.id,
                    };
                    warn!(%event_id, error = %err, "handler failed");
                    report.failed.push(event_id);
                }
                Ok(Some(record)) => {
                    ctx.channel.push(record);
                    ctx.ledger.record(event_id);
                    report.responses += 1;
                    report.committed += 1;
                }
                Ok(None) => {
                    debug!(%event_id, "event acknowledged without response");
                    ctx.ledger.record(event_id);
                    report.committed += 1;
                }
                Err(err) => {
                    warn!(%event_id, error = %err, "handler failed");
                    report.failed.push(event_id);
                }
            }
        }

        report.rerender = report.committed > 0;
        report.completed_at = self.clock.now();
        ctx.last_active_at = report.completed_at;
        ctx.transition(if report.rerender {
            LoopState::Rerender
        } else {
            LoopState::Idle
        });

        info!(
            committed = report.committed,
            failed = report.failed.len(),
            rerender = report.rerender,
            "quest board cycle committed"
        );
        report
    }

    /// Runs presentation passes against `source` until a cycle ends idle.
    ///
    /// Each pass hands the source the current outbox, then runs a cycle over
    /// what it reports. A cycle that commits anything triggers another pass.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RerenderLimit` if the source is still producing new
    /// events after the configured number of re-renders.
    pub async fn drive(
        &self,
        ctx: &mut SessionContext,
        source: &mut dyn EventSource,
    ) -> Result<DriveSummary, SyncError> {
        let mut summary = DriveSummary::default();
        loop {
            let batch = source.render(ctx.responses()).await;
            let report = self.run_cycle(ctx, batch.as_ref()).await;
            let rerender = report.rerender;
            summary.cycles.push(report);

            if !rerender {
                return Ok(summary);
            }
            if summary.rerenders >= self.max_rerenders {
                warn!(session = %ctx.key(), limit = self.max_rerenders, "re-render cap reached");
                return Err(SyncError::RerenderLimit {
                    limit: self.max_rerenders,
                });
            }
            summary.rerenders += 1;
        }
    }

    /// Spawns one task per event and waits for all of them.
    ///
    /// Outcomes come back paired with their event id; a panicking task is
    /// reported as `HandlerError::Aborted` for its own event only.
    async fn dispatch_all(&self, events: Vec<InteractionEvent>) -> Vec<(String, Outcome)> {
        let (ids, tasks): (Vec<String>, Vec<_>) = events
            .into_iter()
            .map(|event| {
                let handler = Arc::clone(&self.handler);
                let id = event.id.clone();
                (id, tokio::spawn(async move { handler.handle(event).await }))
            })
            .unzip();

        let joined = join_all(tasks).await;

        ids.into_iter()
            .zip(joined)
            .map(|(event_id, joined)| {
                let outcome = match joined {
                    Ok(outcome) => outcome,
                    Err(join_error) => Err(HandlerError::Aborted {
                        event_id: event_id.clone(),
                        reason: join_error.to_string(),
                    }),
                };
                (event_id, outcome)
            })
            .collect()
    }
}
