//! Errors raised by the synchronization loop itself.

use questboard_core::error::DomainError;
use thiserror::Error;

/// Failures of the render loop driver. Handler failures never appear here;
/// they are contained per event and reported in the cycle report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The event source kept reporting new events past the re-render cap.
    #[error("event source still reporting new events after {limit} re-renders")]
    RerenderLimit {
        /// The configured cap.
        limit: usize,
    },

    /// The task running a session's cycle panicked or was cancelled by the
    /// runtime before it could commit.
    #[error("render cycle did not complete: {reason}")]
    CycleAborted {
        /// Description of the join failure.
        reason: String,
    },
}

impl From<SyncError> for DomainError {
    fn from(err: SyncError) -> Self {
        Self::Infrastructure(err.to_string())
    }
}
