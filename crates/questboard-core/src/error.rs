//! Error types shared across the quest board crates.

use thiserror::Error;

/// Failure of a single handler invocation.
///
/// A handler failure is contained by the render loop: the event is not
/// recorded as handled and stays eligible for a later cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler refused the event.
    #[error("handler rejected event {event_id}: {reason}")]
    Rejected {
        /// The rejected event.
        event_id: String,
        /// Why the handler refused it.
        reason: String,
    },

    /// The handler returned a record for a different event.
    #[error("handler answered event {expected} with a record for {actual}")]
    MismatchedResponse {
        /// The event that was dispatched.
        expected: String,
        /// The id carried by the returned record.
        actual: String,
    },

    /// The handler task panicked or was aborted before returning.
    #[error("handler task for event {event_id} did not complete: {reason}")]
    Aborted {
        /// The event whose task was lost.
        event_id: String,
        /// Description of the join failure.
        reason: String,
    },

    /// A dependency of the handler failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

/// Top-level domain error type for session-facing operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No session exists for the given identity key.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// A validation error on caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
