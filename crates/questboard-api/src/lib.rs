//! Quest Board API — HTTP bridge between the widget and the sync loop.
//!
//! Each `render` request is one presentation pass of a widget session: the
//! widget posts the events it is reporting and receives the quest list and
//! the current response outbox in return.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod sweeper;
