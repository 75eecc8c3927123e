//! Shared test mocks and utilities for the quest board crates.

mod clock;
mod handler;
mod rng;
mod source;

pub use clock::{FixedClock, ManualClock};
pub use handler::{FailingHandler, RecordingHandler};
pub use rng::{MockRng, SequenceRng};
pub use source::{ScriptedEventSource, WidgetSimulator};
