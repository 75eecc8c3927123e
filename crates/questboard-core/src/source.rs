//! Event source abstraction: the presentation surface hosting the board.

use async_trait::async_trait;

use crate::event::EventBatch;
use crate::response::ResponseRecord;

/// A surface that presents the quest board and reports its interactions.
///
/// One call to `render` is one presentation pass: the surface receives the
/// current response outbox, reconciles its pending quests against it, and
/// returns whatever events it currently reports (or `None` before the user
/// has interacted at all).
#[async_trait]
pub trait EventSource: Send {
    /// Presents the board with `responses` and returns the reported events.
    async fn render(&mut self, responses: &[ResponseRecord]) -> Option<EventBatch>;
}
