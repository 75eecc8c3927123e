//! Domain layer for the Rewards context.

pub mod reward;
