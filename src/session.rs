//! Room session state machine.
//!
//! DESIGN
//! ======
//! One `RoomSession` owns the grid, the change history, and the identity of
//! the single room it is in. Every mutation happens through `&mut self` from
//! one event-handling task, so there is no locking.
//!
//! Requests are fire-and-forget. Nothing is awaited and there is no request
//! id; an inbound event is matched to the session only by comparing its room
//! name with the held one (`event_applies`). Each send leaves a small
//! `SentRecord` behind for inspection, but nothing is ever retried or rolled
//! back. A local edit that the server never acknowledges simply stays.
//!
//! PHASES
//! ======
//! `Disconnected -> Connected -> RoomPending -> RoomActive`. `RoomPending`
//! covers the gap between issuing `create`/`join` and the subscription
//! acknowledgment. Edits are sent during that gap as well.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use sdap::{CellOp, CellPointer, Change, ColorCode, Event, Request, RequestKind, UpdateResult};
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, Viewport};
use crate::grid::Grid;
use crate::history::{ChangeHistory, ChangeRecord};
use crate::layout::Layout;
use crate::render::RenderSink;
use crate::transport::Transport;

/// Maximum entries kept in the send log.
pub const SENT_LOG_CAPACITY: usize = 64;

// =============================================================================
// TYPES
// =============================================================================

/// Lifecycle phase of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// No open transport.
    #[default]
    Disconnected,
    /// Transport open and `hello` sent; no room requested yet.
    Connected,
    /// `create` or `join` issued; subscription not yet acknowledged.
    RoomPending,
    /// Subscription to the held room acknowledged.
    RoomActive,
}

/// Last change the session knows it has reconciled with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Watermark {
    pub change_id: Option<String>,
    pub change_at: Option<String>,
}

/// Observability entry for one outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentRecord {
    pub kind: RequestKind,
    pub room: Option<String>,
    pub at_ms: i64,
    /// Whether the transport accepted the message.
    pub delivered: bool,
}

/// Result of a local edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// Cell outside the grid; nothing drawn, nothing sent.
    OutOfBounds,
    /// Cell written and drawn. `sent` is true when an update went out.
    Applied { sent: bool },
}

/// Whether an inbound event concerns the room the session holds.
///
/// Events that name no room always apply. `RoomCreated` applies only while no
/// room is held, since a create clears the previous identity first.
#[must_use]
pub fn event_applies(event: &Event, room: Option<&str>) -> bool {
    match event {
        Event::RoomCreated { .. } => room.is_none(),
        _ => event.room().is_none_or(|name| room == Some(name)),
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub struct RoomSession<T: Transport, R: RenderSink> {
    username: String,
    layout: Layout,
    /// Most recent viewport; a create over an existing room rebuilds the grid
    /// from it.
    viewport: Viewport,
    phase: SessionPhase,
    room: Option<String>,
    awaiting_create: bool,
    grid: Grid,
    history: ChangeHistory,
    watermark: Watermark,
    sent: VecDeque<SentRecord>,
    transport: T,
    render: R,
}

impl<T: Transport, R: RenderSink> RoomSession<T, R> {
    #[must_use]
    pub fn new(config: &ClientConfig, transport: T, render: R) -> Self {
        let (max_x, max_y) = config
            .layout
            .bounds_for_viewport(config.viewport.width, config.viewport.height);
        Self {
            username: config.username.clone(),
            layout: config.layout,
            viewport: config.viewport,
            phase: SessionPhase::Disconnected,
            room: None,
            awaiting_create: false,
            grid: Grid::new(max_x, max_y),
            history: ChangeHistory::new(),
            watermark: Watermark::default(),
            sent: VecDeque::with_capacity(SENT_LOG_CAPACITY),
            transport,
            render,
        }
    }

    // ----- accessors -----

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn history(&self) -> &ChangeHistory {
        &self.history
    }

    #[must_use]
    pub fn watermark(&self) -> &Watermark {
        &self.watermark
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Send log, oldest first.
    pub fn sent_log(&self) -> impl Iterator<Item = &SentRecord> {
        self.sent.iter()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[must_use]
    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn render_mut(&mut self) -> &mut R {
        &mut self.render
    }

    // ----- transport lifecycle -----

    /// Transport opened: introduce ourselves.
    pub fn on_open(&mut self) {
        info!(username = %self.username, "session: transport open");
        self.phase = SessionPhase::Connected;
        self.send(Request::hello(self.username.clone()));
    }

    /// Transport closed. The room identity and grid are kept; nothing is
    /// retried.
    pub fn on_close(&mut self) {
        info!(room = ?self.room, "session: transport closed");
        self.phase = SessionPhase::Disconnected;
    }

    /// Connection could not be established. Logged only.
    pub fn on_connect_failed(&mut self, reason: &str) {
        warn!(%reason, "session: connect failed");
        self.phase = SessionPhase::Disconnected;
    }

    // ----- user operations -----

    /// Rebuild the grid for a new viewport size, keeping overlapping cells.
    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        let (max_x, max_y) = self.layout.bounds_for_viewport(width, height);
        debug!(width, height, max_x, max_y, "session: viewport resized");
        self.viewport = Viewport { width, height };
        self.grid.resize(max_x, max_y);
        self.render.redraw(&self.grid);
    }

    /// Ask the server for a new room seeded with the current grid.
    ///
    /// When a room is already held, the grid is first reset to a blank grid
    /// sized for the current viewport and the old room is unsubscribed
    /// without waiting for a reply.
    pub fn create_room(&mut self) {
        if let Some(old) = self.room.take() {
            let (max_x, max_y) = self
                .layout
                .bounds_for_viewport(self.viewport.width, self.viewport.height);
            self.grid = Grid::new(max_x, max_y);
            self.render.redraw(&self.grid);
            info!(room = %old, "session: leaving room for create");
            self.send(Request::unsubscribe(old));
        }
        self.awaiting_create = true;
        self.phase = SessionPhase::RoomPending;
        self.send(Request::create(sdap::grid_schema(), self.grid.snapshot()));
    }

    /// Switch to an existing room by name.
    ///
    /// `get` and `subscribe` go out back to back; their replies may arrive in
    /// either order.
    pub fn join_room(&mut self, name: &str) {
        if let Some(old) = self.room.take() {
            self.send(Request::unsubscribe(old));
        }
        info!(room = %name, "session: joining room");
        self.awaiting_create = false;
        self.room = Some(name.to_owned());
        self.phase = SessionPhase::RoomPending;
        self.render.room_changed(name);
        self.send(Request::get(name));
        self.send(Request::subscribe(name));
    }

    /// Paint at a surface pixel position. Non-finite coordinates are treated
    /// as out of bounds.
    pub fn apply_local_edit(&mut self, px: f64, py: f64, color: ColorCode) -> EditOutcome {
        let Some((x, y)) = self.layout.cell_at(px, py) else {
            debug!(px, py, "session: edit at non-finite position");
            return EditOutcome::OutOfBounds;
        };
        self.apply_cell_edit(x, y, color)
    }

    /// Paint a cell optimistically and, when a room is held, send it.
    pub fn apply_cell_edit(&mut self, x: i64, y: i64, color: ColorCode) -> EditOutcome {
        if !self.grid.set_cell(x, y, color) {
            debug!(x, y, "session: edit out of bounds");
            return EditOutcome::OutOfBounds;
        }
        // set_cell accepted the coordinates, so both are non-negative.
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return EditOutcome::OutOfBounds;
        };
        self.render.draw_cell(x, y, color);

        let Some(room) = self.room.clone() else {
            return EditOutcome::Applied { sent: false };
        };
        let sent = self.send(Request::set_cell(room, CellPointer::new(x, y), color));
        EditOutcome::Applied { sent }
    }

    // ----- inbound -----

    /// Decode and handle one inbound text message. Undecodable text is logged
    /// and leaves the session untouched.
    pub fn handle_message(&mut self, raw: &str) {
        match sdap::decode(raw) {
            Ok(event) => self.handle_event(event),
            Err(e) => warn!(error = %e, len = raw.len(), "session: dropping undecodable message"),
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        if !event_applies(&event, self.room.as_deref()) {
            debug!(event_room = ?event.room(), room = ?self.room, "session: event for another room ignored");
            return;
        }

        match event {
            Event::HelloAck { new_username } => {
                info!(username = %new_username, "session: hello acknowledged");
                self.username = new_username;
            }
            Event::RoomCreated { name } => self.on_room_created(name),
            Event::RoomFetched { name, value, last_change_id, last_change_at } => {
                let Some(grid) = Grid::from_snapshot(value) else {
                    warn!(room = %name, "session: room snapshot exceeds grid limits; keeping current grid");
                    return;
                };
                self.grid = grid;
                self.watermark = Watermark { change_id: last_change_id, change_at: last_change_at };
                info!(
                    room = %name,
                    max_x = self.grid.max_x(),
                    max_y = self.grid.max_y(),
                    change_id = ?self.watermark.change_id,
                    "session: room fetched"
                );
                self.render.redraw(&self.grid);
            }
            Event::RoomUpdated { name, results } => self.on_room_updated(&name, results),
            Event::Subscribed { name, success } => {
                if success {
                    info!(room = %name, "session: subscribed");
                    self.phase = SessionPhase::RoomActive;
                } else {
                    warn!(room = %name, "session: subscribe refused");
                }
            }
            Event::Unsubscribed { name, success } => {
                debug!(room = %name, success, "session: unsubscribe acknowledged");
            }
            Event::ChangesBroadcast { name, changes } => self.on_changes(&name, changes),
            Event::Unhandled { kind } => {
                debug!(%kind, "session: unhandled message type");
            }
        }
    }

    fn on_room_created(&mut self, name: String) {
        if !self.awaiting_create {
            debug!(room = %name, "session: unsolicited create reply ignored");
            return;
        }
        info!(room = %name, "session: room created");
        self.awaiting_create = false;
        self.render.room_changed(&name);
        self.send(Request::subscribe(name.clone()));
        self.room = Some(name);
    }

    /// Own updates acknowledged. Bookkeeping only; the grid already holds the
    /// optimistic values.
    fn on_room_updated(&mut self, name: &str, results: Vec<UpdateResult>) {
        debug!(room = %name, count = results.len(), "session: update acknowledged");
        for result in results {
            self.history.record(ChangeRecord::own(result));
        }
    }

    /// Apply remote changes in arrival order, last write wins per cell.
    fn on_changes(&mut self, name: &str, changes: Vec<Change>) {
        let mut applied = 0_usize;
        for change in changes {
            let before = applied;
            for remote in &change.ops {
                let CellOp::Set { value } = &remote.op else {
                    continue;
                };
                let Some(pointer) = CellPointer::parse(&remote.pointer) else {
                    debug!(pointer = %remote.pointer, "session: malformed cell pointer skipped");
                    continue;
                };
                let value = *value;
                if self.grid.set(pointer.x, pointer.y, value) {
                    self.render.draw_cell(pointer.x, pointer.y, value);
                }
                self.history.record(ChangeRecord::other(
                    &change.change_id,
                    &change.change_time,
                    &pointer.to_string(),
                    value,
                ));
                applied += 1;
            }
            // Changes with nothing applicable leave the watermark where it was.
            if applied > before {
                self.watermark = Watermark {
                    change_id: Some(change.change_id),
                    change_at: Some(change.change_time),
                };
            }
        }
        debug!(room = %name, applied, "session: remote changes applied");
    }

    /// Encode and hand one request to the transport. Failures are logged and
    /// recorded, never retried. Returns whether the transport accepted it.
    fn send(&mut self, request: Request) -> bool {
        let kind = request.kind();
        let room = request_room(&request);
        let delivered = match sdap::encode(&request) {
            Ok(text) => match self.transport.send(text) {
                Ok(()) => true,
                Err(e) => {
                    warn!(kind = kind.as_str(), error = %e, "session: send failed");
                    false
                }
            },
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "session: encode failed");
                false
            }
        };
        if self.sent.len() == SENT_LOG_CAPACITY {
            self.sent.pop_front();
        }
        self.sent.push_back(SentRecord { kind, room, at_ms: now_ms(), delivered });
        delivered
    }
}

fn request_room(request: &Request) -> Option<String> {
    match request {
        Request::Get { name }
        | Request::Update { name, .. }
        | Request::Subscribe { name }
        | Request::Unsubscribe { name } => Some(name.clone()),
        Request::Hello { .. } | Request::Create { .. } => None,
    }
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
