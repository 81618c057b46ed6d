//! Message model and JSON codec for the self-described aggregation protocol (SDAP).
//!
//! This crate owns the wire representation used by the room session and its
//! drivers. Outbound messages are typed [`Request`] values serialized with a
//! `type` discriminator; inbound text decodes into [`Event`] values. Nothing in
//! here performs I/O, so every function can be tested without a transport.

mod decode;

pub use decode::{Change, Event, RemoteOp, UpdateResult, decode};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned by [`encode`] and [`decode`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw text is not valid JSON.
    #[error("failed to parse message: {0}")]
    Json(#[source] serde_json::Error),
    /// The message parsed but is not a JSON object.
    #[error("message is not a JSON object")]
    NotAnObject,
    /// The message object has no string `type` discriminator.
    #[error("message has no `type` discriminator")]
    MissingType,
    /// A known message type is missing a field it cannot do without.
    #[error("message is missing field `{0}`")]
    MissingField(&'static str),
    /// A required field is present but has the wrong shape.
    #[error("message field `{0}` has an unexpected shape")]
    InvalidField(&'static str),
    /// A request could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

// =============================================================================
// COLOR CODES
// =============================================================================

/// Paint state of one cell as it travels on the wire.
///
/// Names are presentation labels only; the integer is what the server stores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorCode(pub u8);

impl ColorCode {
    pub const WHITE: Self = Self(0);
    pub const RED: Self = Self(1);
    pub const BLUE: Self = Self(2);
    /// Code of an unpainted cell.
    pub const BACKGROUND: Self = Self::WHITE;

    /// Look up a code by its color name, ignoring case and surrounding space.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "blue" => Some(Self::BLUE),
            _ => None,
        }
    }

    /// Presentation name, or `None` for codes without one.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::WHITE => Some("white"),
            Self::RED => Some("red"),
            Self::BLUE => Some("blue"),
            _ => None,
        }
    }

    /// Read a code from a JSON value, if it is an integer in `0..=255`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let n = value.as_u64()?;
        match u8::try_from(n) {
            Ok(code) => Some(Self(code)),
            Err(_) => None,
        }
    }
}

/// Full room contents: rows of cells, indexed `[y][x]`.
pub type GridSnapshot = Vec<Vec<ColorCode>>;

// =============================================================================
// CELL POINTERS AND OPERATIONS
// =============================================================================

/// Location of one cell inside an update, written `/<y>/<x>` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellPointer {
    pub x: usize,
    pub y: usize,
}

impl CellPointer {
    #[must_use]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Parse a `/<y>/<x>` path. Anything other than exactly two segments of
    /// plain ASCII digits yields `None`. Leading zeros are accepted; use the
    /// `Display` form for the canonical path.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut segments = raw.split('/');
        let (Some(""), Some(y), Some(x), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };
        if !is_plain_index(y) || !is_plain_index(x) {
            return None;
        }
        match (y.parse::<usize>(), x.parse::<usize>()) {
            (Ok(y), Ok(x)) => Some(Self { x, y }),
            _ => None,
        }
    }
}

fn is_plain_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for CellPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.y, self.x)
    }
}

/// One operation against a cell.
///
/// Only `set` is defined. Other kinds are reserved by the protocol; they
/// decode to [`CellOp::Reserved`] and are never sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CellOp {
    Set { value: ColorCode },
    #[serde(skip_serializing)]
    Reserved { kind: String },
}

/// Operations keyed by cell-pointer string.
pub type CellOps = BTreeMap<String, CellOp>;

/// One entry of the `updates` array in an `update` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpdateBatch {
    pub ops: CellOps,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Client-to-server message.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Request {
    Hello { username: String },
    Create { schema: Value, value: GridSnapshot },
    Get { name: String },
    Update { name: String, updates: Vec<UpdateBatch> },
    Subscribe { name: String },
    Unsubscribe { name: String },
}

/// Discriminator of a [`Request`], kept by the session's send log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Hello,
    Create,
    Get,
    Update,
    Subscribe,
    Unsubscribe,
}

impl RequestKind {
    /// Wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Create => "create",
            Self::Get => "get",
            Self::Update => "update",
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
        }
    }
}

impl Request {
    #[must_use]
    pub fn hello(username: impl Into<String>) -> Self {
        Self::Hello { username: username.into() }
    }

    #[must_use]
    pub fn create(schema: Value, value: GridSnapshot) -> Self {
        Self::Create { schema, value }
    }

    #[must_use]
    pub fn get(name: impl Into<String>) -> Self {
        Self::Get { name: name.into() }
    }

    /// Build an update carrying a single batch of operations.
    #[must_use]
    pub fn update(name: impl Into<String>, ops: CellOps) -> Self {
        Self::Update {
            name: name.into(),
            updates: vec![UpdateBatch { ops }],
        }
    }

    /// Build an update that sets exactly one cell.
    #[must_use]
    pub fn set_cell(name: impl Into<String>, pointer: CellPointer, value: ColorCode) -> Self {
        let mut ops = CellOps::new();
        ops.insert(pointer.to_string(), CellOp::Set { value });
        Self::update(name, ops)
    }

    #[must_use]
    pub fn subscribe(name: impl Into<String>) -> Self {
        Self::Subscribe { name: name.into() }
    }

    #[must_use]
    pub fn unsubscribe(name: impl Into<String>) -> Self {
        Self::Unsubscribe { name: name.into() }
    }

    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Hello { .. } => RequestKind::Hello,
            Self::Create { .. } => RequestKind::Create,
            Self::Get { .. } => RequestKind::Get,
            Self::Update { .. } => RequestKind::Update,
            Self::Subscribe { .. } => RequestKind::Subscribe,
            Self::Unsubscribe { .. } => RequestKind::Unsubscribe,
        }
    }
}

/// JSON-Schema shape sent with `create`: an array of arrays of integers.
#[must_use]
pub fn grid_schema() -> Value {
    serde_json::json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "type": "array",
        "items": [
            {
                "type": "array",
                "items": [
                    { "type": "integer" }
                ]
            }
        ]
    })
}

/// Encode a request into JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if the request holds a reserved operation,
/// which has no outbound representation.
pub fn encode(request: &Request) -> Result<String, CodecError> {
    serde_json::to_string(request).map_err(CodecError::Encode)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
