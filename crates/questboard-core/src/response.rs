//! Responses handed back to the widget.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A scalar inside a structured response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseField {
    /// Free text.
    Text(String),
    /// A boolean flag.
    Flag(bool),
}

/// The value a handler computed for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// Free text, e.g. a reward amount.
    Text(String),
    /// A boolean flag.
    Flag(bool),
    /// A mapping of named scalars.
    Fields(BTreeMap<String, ResponseField>),
}

impl From<String> for ResponseValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ResponseValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<bool> for ResponseValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// One computed response, correlated with its event by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Id of the originating event.
    #[serde(rename = "uniqueID")]
    pub id: String,
    /// The computed value.
    #[serde(rename = "detail")]
    pub value: ResponseValue,
}

impl ResponseRecord {
    /// Creates a record for the given event id.
    #[must_use]
    pub fn new(id: impl Into<String>, value: impl Into<ResponseValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}
