//! Rendering callback surface.

use sdap::ColorCode;

use crate::grid::Grid;

/// Receives paint requests from the session.
///
/// Implementations map cells to their own surface; the session only reports
/// which cell changed and to what.
pub trait RenderSink {
    /// Paint one cell.
    fn draw_cell(&mut self, x: usize, y: usize, color: ColorCode);

    /// Repaint the whole grid after a resize or a wholesale replacement.
    fn redraw(&mut self, grid: &Grid);

    /// The session adopted a new room name.
    fn room_changed(&mut self, _name: &str) {}
}
