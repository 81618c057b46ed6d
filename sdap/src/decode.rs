//! Inbound message decoding.
//!
//! DESIGN
//! ======
//! Server messages are parsed into a `serde_json::Value` first and picked
//! apart field by field rather than derived, because the server has shipped
//! more than one generation of field names (`name` vs. `id`, `results` vs.
//! `updates`). Unknown `type` values become [`Event::Unhandled`] so callers can
//! ignore them explicitly.

#[cfg(test)]
#[path = "decode_test.rs"]
mod decode_test;

use serde::Serialize;
use serde_json::Value;

use crate::{CellOp, CodecError, ColorCode, GridSnapshot};

/// Server-to-client message.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Reply to `hello` carrying the name the server assigned.
    HelloAck { new_username: String },
    /// Reply to `create` carrying the new room's name.
    RoomCreated { name: String },
    /// Reply to `get` with the authoritative room contents.
    RoomFetched {
        name: String,
        value: GridSnapshot,
        last_change_id: Option<String>,
        last_change_at: Option<String>,
    },
    /// Acknowledgment of this client's own `update`.
    RoomUpdated { name: String, results: Vec<UpdateResult> },
    Subscribed { name: String, success: bool },
    Unsubscribed { name: String, success: bool },
    /// Unsolicited push of changes applied by any participant.
    ChangesBroadcast { name: String, changes: Vec<Change> },
    /// A message whose `type` this client does not know.
    Unhandled { kind: String },
}

impl Event {
    /// Room the event refers to, if it refers to one.
    #[must_use]
    pub fn room(&self) -> Option<&str> {
        match self {
            Self::RoomCreated { name }
            | Self::RoomFetched { name, .. }
            | Self::RoomUpdated { name, .. }
            | Self::Subscribed { name, .. }
            | Self::Unsubscribed { name, .. }
            | Self::ChangesBroadcast { name, .. } => Some(name),
            Self::HelloAck { .. } | Self::Unhandled { .. } => None,
        }
    }
}

/// Server receipt for one applied update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub change_id: String,
    pub change_time: String,
}

/// One server-applied change inside a `changes` broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    pub change_id: String,
    pub change_time: String,
    pub ops: Vec<RemoteOp>,
}

/// A cell operation as received, with its pointer left unparsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteOp {
    pub pointer: String,
    pub op: CellOp,
}

/// Decode one inbound text message.
///
/// # Errors
///
/// Returns [`CodecError`] when the text is not a JSON object with a string
/// `type`, or when a known message type lacks a field it cannot do without.
/// Unknown types are not an error.
pub fn decode(raw: &str) -> Result<Event, CodecError> {
    let value: Value = serde_json::from_str(raw).map_err(CodecError::Json)?;
    if !value.is_object() {
        return Err(CodecError::NotAnObject);
    }
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingType)?;

    match kind {
        "hello" => Ok(Event::HelloAck {
            new_username: pick_str(&value, &["newUsername", "username"])
                .ok_or(CodecError::MissingField("newUsername"))?
                .to_owned(),
        }),
        "create" => {
            let created = value.get("created").ok_or(CodecError::MissingField("created"))?;
            let name = pick_str(created, &["name", "id"]).ok_or(CodecError::MissingField("created.name"))?;
            Ok(Event::RoomCreated { name: name.to_owned() })
        }
        "get" => Ok(Event::RoomFetched {
            name: room_name(&value)?,
            value: parse_snapshot(value.get("value").ok_or(CodecError::MissingField("value"))?)?,
            last_change_id: pick_token(&value, &["lastChangeId"]),
            last_change_at: pick_token(&value, &["lastChangeAt", "lastChangeTime"]),
        }),
        "update" => Ok(Event::RoomUpdated {
            name: room_name(&value)?,
            results: pick_array(&value, &["results", "updates"])
                .map(|rows| rows.iter().map(parse_update_result).collect())
                .unwrap_or_default(),
        }),
        "subscribe" => Ok(Event::Subscribed {
            name: room_name(&value)?,
            success: success_flag(&value),
        }),
        "unsubscribe" => Ok(Event::Unsubscribed {
            name: room_name(&value)?,
            success: success_flag(&value),
        }),
        "changes" => Ok(Event::ChangesBroadcast {
            name: room_name(&value)?,
            changes: value
                .get("changes")
                .and_then(Value::as_array)
                .map(|rows| rows.iter().map(parse_change).collect())
                .unwrap_or_default(),
        }),
        other => Ok(Event::Unhandled { kind: other.to_owned() }),
    }
}

fn room_name(data: &Value) -> Result<String, CodecError> {
    pick_str(data, &["name", "id"])
        .map(str::to_owned)
        .ok_or(CodecError::MissingField("name"))
}

fn success_flag(data: &Value) -> bool {
    data.get("success").and_then(Value::as_bool).unwrap_or(false)
}

fn parse_snapshot(value: &Value) -> Result<GridSnapshot, CodecError> {
    let rows = value.as_array().ok_or(CodecError::InvalidField("value"))?;
    Ok(rows
        .iter()
        .map(|row| {
            row.as_array()
                .map(|cells| {
                    cells
                        .iter()
                        .map(|cell| ColorCode::from_json(cell).unwrap_or(ColorCode::BACKGROUND))
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect())
}

fn parse_update_result(row: &Value) -> UpdateResult {
    UpdateResult {
        change_id: pick_token(row, &["changeId"]).unwrap_or_default(),
        change_time: pick_token(row, &["changeTime"]).unwrap_or_default(),
    }
}

fn parse_change(row: &Value) -> Change {
    let ops = row
        .get("ops")
        .and_then(Value::as_object)
        .map(|ops| {
            ops.iter()
                .filter_map(|(pointer, op)| {
                    parse_op(op).map(|op| RemoteOp { pointer: pointer.clone(), op })
                })
                .collect()
        })
        .unwrap_or_default();

    Change {
        change_id: pick_token(row, &["changeId"]).unwrap_or_default(),
        change_time: pick_token(row, &["changeTime"]).unwrap_or_default(),
        ops,
    }
}

/// A `set` without an integer value is dropped; any other kind is kept as reserved.
fn parse_op(op: &Value) -> Option<CellOp> {
    let kind = op.get("type").and_then(Value::as_str)?;
    if kind == "set" {
        let value = op.get("value").and_then(ColorCode::from_json)?;
        return Some(CellOp::Set { value });
    }
    Some(CellOp::Reserved { kind: kind.to_owned() })
}

fn pick_str<'a>(data: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| data.get(key).and_then(Value::as_str))
}

fn pick_array<'a>(data: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter()
        .find_map(|key| data.get(key).and_then(Value::as_array))
}

/// Opaque server token: strings pass through, numbers become their decimal text.
fn pick_token(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match data.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
