//! Pixelroom: collaborative pixel-grid room client.
//!
//! DESIGN
//! ======
//! A `RoomSession` owns one room's `Grid` and a bounded `ChangeHistory`. Local
//! edits are written to the grid first and sent afterwards; remote edits
//! arrive as `changes` broadcasts and are applied in arrival order. The
//! session talks to the outside only through two ports: a `Transport` that
//! accepts encoded SDAP text, and a `RenderSink` that paints cells.
//!
//! Wire encoding and decoding live in the `sdap` crate. Socket plumbing and
//! terminal input live in the `pixelroom-cli` binary.

pub mod config;
pub mod grid;
pub mod history;
pub mod layout;
pub mod render;
pub mod session;
pub mod transport;

pub use config::{ClientConfig, ConfigError, Viewport};
pub use grid::Grid;
pub use history::{ChangeHistory, ChangeOrigin, ChangePayload, ChangeRecord, HISTORY_CAPACITY};
pub use layout::{CellRect, Layout};
pub use render::RenderSink;
pub use sdap::{CellPointer, ColorCode, Event, Request, RequestKind};
pub use session::{EditOutcome, RoomSession, SentRecord, SessionPhase, Watermark, event_applies};
pub use transport::{Outbox, Transport, TransportError};
