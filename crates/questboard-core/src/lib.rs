//! Quest Board Core — shared abstractions.
//!
//! This crate defines the event, response and handler types that the
//! synchronization loop and every handler implementation depend on. It
//! contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod handler;
pub mod response;
pub mod rng;
pub mod source;
