//! Bounded log of applied changes, own and remote.
//!
//! DESIGN
//! ======
//! A fixed-capacity ring: records land at a write cursor that wraps, so the
//! oldest entry is silently overwritten once the buffer is full. The log is
//! for inspection only; the grid is never rebuilt from it.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use sdap::{ColorCode, UpdateResult};
use serde::Serialize;

/// Maximum number of records retained.
pub const HISTORY_CAPACITY: usize = 200;

/// Who made the change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOrigin {
    /// Server acknowledgment of an update this session sent.
    Own,
    /// Change observed in a `changes` broadcast.
    Other,
}

/// What the record carries besides its id and time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChangePayload {
    Ack(UpdateResult),
    Remote { pointer: String, value: ColorCode },
}

/// One history entry. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub change_id: String,
    pub change_time: String,
    pub origin: ChangeOrigin,
    pub payload: ChangePayload,
}

impl ChangeRecord {
    #[must_use]
    pub fn own(result: UpdateResult) -> Self {
        Self {
            change_id: result.change_id.clone(),
            change_time: result.change_time.clone(),
            origin: ChangeOrigin::Own,
            payload: ChangePayload::Ack(result),
        }
    }

    #[must_use]
    pub fn other(change_id: &str, change_time: &str, pointer: &str, value: ColorCode) -> Self {
        Self {
            change_id: change_id.to_owned(),
            change_time: change_time.to_owned(),
            origin: ChangeOrigin::Other,
            payload: ChangePayload::Remote { pointer: pointer.to_owned(), value },
        }
    }
}

/// Fixed-capacity ring buffer of [`ChangeRecord`]s in arrival order.
#[derive(Clone, Debug, Default)]
pub struct ChangeHistory {
    entries: Vec<ChangeRecord>,
    /// Slot the next record is written to once the buffer is full.
    cursor: usize,
    last_change_id: Option<String>,
    last_change_time: Option<String>,
}

impl ChangeHistory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(HISTORY_CAPACITY),
            ..Self::default()
        }
    }

    /// Append a record, overwriting the oldest one when full.
    pub fn record(&mut self, change: ChangeRecord) {
        self.last_change_id = Some(change.change_id.clone());
        self.last_change_time = Some(change.change_time.clone());
        if self.entries.len() < HISTORY_CAPACITY {
            self.entries.push(change);
        } else {
            self.entries[self.cursor] = change;
        }
        self.cursor = (self.cursor + 1) % HISTORY_CAPACITY;
    }

    /// Records from oldest to newest.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ChangeRecord> {
        if self.entries.len() < HISTORY_CAPACITY {
            return self.entries.clone();
        }
        let (newer, older) = self.entries.split_at(self.cursor);
        older.iter().chain(newer).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last_change_id(&self) -> Option<&str> {
        self.last_change_id.as_deref()
    }

    #[must_use]
    pub fn last_change_time(&self) -> Option<&str> {
        self.last_change_time.as_deref()
    }
}
