//! Quest Board — Rewards bounded context.
//!
//! Answers quest activations with the quest's reward. The rule itself is a
//! stand-in for arbitrary external work: a length-based base amount scaled by
//! a random factor, delivered after a simulated latency.

pub mod application;
pub mod domain;
