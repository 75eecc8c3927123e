//! Application layer for the Rewards context.

pub mod event_handlers;
