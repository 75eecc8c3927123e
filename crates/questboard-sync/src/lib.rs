//! Quest Board Sync — the event synchronization loop.
//!
//! Captures widget interactions once, dispatches each new one to a handler
//! exactly once, and feeds the results back to the widget on the next render.
//! All state is session scoped: a [`session::SessionContext`] owns the dedup
//! ledger and the response channel, and a [`session::SessionStore`] maps
//! session identity keys to contexts.

pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod ledger;
pub mod render_loop;
pub mod session;
