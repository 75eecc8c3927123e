//! Interaction events reported by the quest board widget.
//!
//! The widget reports its pending interactions as a JSON batch. Each entry is
//! validated on its own so a single malformed entry never rejects the batch.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of interaction a widget event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A quest was activated (clicked) on the board.
    #[serde(rename = "quest-clicked", alias = "activated")]
    Activated,
}

impl EventKind {
    /// Returns the wire tag for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activated => "quest-clicked",
        }
    }

    /// Parses a wire tag, accepting the legacy `activated` spelling.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "quest-clicked" | "activated" => Some(Self::Activated),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated user interaction. Immutable once emitted by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// What happened.
    #[serde(rename = "event")]
    pub kind: EventKind,
    /// Interaction payload; for quest clicks, the quest name.
    #[serde(rename = "detail")]
    pub payload: String,
    /// Opaque identifier, unique per interaction.
    #[serde(rename = "uniqueID")]
    pub id: String,
}

impl InteractionEvent {
    /// Creates a quest activation event.
    #[must_use]
    pub fn activated(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Activated,
            payload: payload.into(),
            id: id.into(),
        }
    }

    /// Renders the event in its wire shape.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        serde_json::json!({
            "event": self.kind.as_str(),
            "detail": self.payload,
            "uniqueID": self.id,
        })
    }
}

/// Wire shape of an event before validation. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct RawEvent {
    event: Option<String>,
    detail: Option<String>,
    #[serde(rename = "uniqueID")]
    unique_id: Option<String>,
}

/// Why a reported entry could not be turned into an `InteractionEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedEvent {
    /// The entry is not an object with string fields.
    InvalidShape(String),
    /// The entry has no usable `uniqueID`.
    MissingId,
    /// The entry has no `event` tag.
    MissingKind {
        /// Id of the offending entry.
        id: String,
    },
    /// The `event` tag is not one the board emits.
    UnknownKind {
        /// Id of the offending entry.
        id: String,
        /// The unrecognized tag.
        kind: String,
    },
}

impl fmt::Display for MalformedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape(reason) => write!(f, "invalid event shape: {reason}"),
            Self::MissingId => f.write_str("event has no uniqueID"),
            Self::MissingKind { id } => write!(f, "event {id} has no kind"),
            Self::UnknownKind { id, kind } => write!(f, "event {id} has unknown kind {kind:?}"),
        }
    }
}

impl TryFrom<&Value> for InteractionEvent {
    type Error = MalformedEvent;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let raw = RawEvent::deserialize(value)
            .map_err(|e| MalformedEvent::InvalidShape(e.to_string()))?;

        let id = raw
            .unique_id
            .filter(|id| !id.is_empty())
            .ok_or(MalformedEvent::MissingId)?;
        let tag = raw
            .event
            .ok_or_else(|| MalformedEvent::MissingKind { id: id.clone() })?;
        let kind = EventKind::parse(&tag).ok_or(MalformedEvent::UnknownKind {
            id: id.clone(),
            kind: tag,
        })?;

        Ok(Self {
            kind,
            payload: raw.detail.unwrap_or_default(),
            id,
        })
    }
}

/// The value the widget reports on each render: its pending events.
///
/// An absent `events` field and an empty list are treated identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    /// Raw entries as reported by the widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Value>>,
}

/// Result of validating an `EventBatch`.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    /// Well-formed events, in reported order.
    pub events: Vec<InteractionEvent>,
    /// Entries that were skipped.
    pub malformed: Vec<MalformedEvent>,
}

impl EventBatch {
    /// Builds a batch from already validated events.
    #[must_use]
    pub fn from_events(events: &[InteractionEvent]) -> Self {
        Self {
            events: Some(events.iter().map(InteractionEvent::to_wire).collect()),
        }
    }

    /// Returns `true` when the widget reported nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.as_ref().is_none_or(Vec::is_empty)
    }

    /// Validates every entry, separating well-formed events from malformed ones.
    #[must_use]
    pub fn parse(&self) -> ParsedBatch {
        let mut parsed = ParsedBatch::default();
        for entry in self.events.iter().flatten() {
            match InteractionEvent::try_from(entry) {
                Ok(event) => parsed.events.push(event),
                Err(malformed) => parsed.malformed.push(malformed),
            }
        }
        parsed
    }
}
