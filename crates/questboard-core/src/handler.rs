//! Event handler abstraction.

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::event::InteractionEvent;
use crate::response::ResponseRecord;

/// Asynchronous computation that answers one interaction event.
///
/// Handlers own their dependencies and never write session state; they return
/// their result and the render loop commits it. `Ok(None)` acknowledges the
/// event without producing anything for the widget.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handles a single event.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError` when the event cannot be answered this cycle.
    async fn handle(&self, event: InteractionEvent)
    -> Result<Option<ResponseRecord>, HandlerError>;
}
