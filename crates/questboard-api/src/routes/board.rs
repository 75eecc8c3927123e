//! Routes for quest board sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use questboard_core::error::DomainError;
use questboard_core::event::EventBatch;
use questboard_core::response::ResponseRecord;
use questboard_sync::render_loop::{CycleReport, LoopState};
use questboard_sync::session::SessionKey;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for POST /{session_key}/render.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    /// Quest names to display.
    pub quests: Vec<String>,
    /// Current response outbox; the widget correlates by `uniqueID`.
    pub event_responses: Vec<ResponseRecord>,
    /// Whether the widget should render again to pick up new responses.
    pub rerender: bool,
    /// What this cycle did.
    pub cycle: CycleReport,
}

/// Read-only view of a session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// The session identity key.
    pub session_key: SessionKey,
    /// Quest names to display.
    pub quests: Vec<String>,
    /// Current response outbox.
    pub event_responses: Vec<ResponseRecord>,
    /// Number of events handled so far.
    pub handled: usize,
    /// Render loop state.
    pub state: LoopState,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
    /// When the last cycle ran.
    pub last_active_at: DateTime<Utc>,
}

/// POST /{session_key}/render
#[instrument(skip(state, batch), fields(session = %session_key))]
async fn render_board(
    State(state): State<AppState>,
    Path(session_key): Path<String>,
    Json(batch): Json<EventBatch>,
) -> Result<Json<RenderResponse>, ApiError> {
    let key = SessionKey::parse(session_key)?;
    let session = state.sessions.open(&key).await;

    // Runs on its own task: a client that disconnects mid-batch does not
    // cancel dispatch or commit.
    let pass = state
        .render_loop
        .render(session, Some(batch))
        .await?;
    let cycle = pass.report;
    info!(cycle_id = %cycle.cycle_id, rerender = cycle.rerender, "render pass handled");

    Ok(Json(RenderResponse {
        quests: state.quests.to_vec(),
        event_responses: pass.responses,
        rerender: cycle.rerender,
        cycle,
    }))
}

/// GET /{session_key}
#[instrument(skip(state), fields(session = %session_key))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_key): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let key = SessionKey::parse(session_key)?;
    let session = state
        .sessions
        .get(&key)
        .await
        .ok_or_else(|| DomainError::SessionNotFound(key.to_string()))?;
    let ctx = session.lock().await;

    Ok(Json(SessionView {
        session_key: key,
        quests: state.quests.to_vec(),
        event_responses: ctx.responses().to_vec(),
        handled: ctx.ledger().len(),
        state: ctx.state(),
        opened_at: ctx.opened_at(),
        last_active_at: ctx.last_active_at(),
    }))
}

/// DELETE /{session_key}
#[instrument(skip(state), fields(session = %session_key))]
async fn end_session(
    State(state): State<AppState>,
    Path(session_key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let key = SessionKey::parse(session_key)?;
    state.sessions.end(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for quest board sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{session_key}/render", post(render_board))
        .route("/{session_key}", get(get_session).delete(end_session))
}
