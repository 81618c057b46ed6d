//! Mapping between drawing-surface pixels and grid cells.
//!
//! The surface is framed by a border of `border_width` pixels; inside it each
//! cell is a `cell_pitch` square. Viewport sizes additionally give up a
//! `clear_margin` before the grid bounds are derived.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::grid::MAX_GRID_SIDE;

pub const DEFAULT_BORDER_WIDTH: u32 = 4;
pub const DEFAULT_CELL_PITCH: u32 = 10;
pub const DEFAULT_CLEAR_MARGIN: u32 = 25;

/// Square occupied by one cell on the surface, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Surface geometry shared by input mapping and rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub border_width: u32,
    pub cell_pitch: u32,
    pub clear_margin: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            border_width: DEFAULT_BORDER_WIDTH,
            cell_pitch: DEFAULT_CELL_PITCH,
            clear_margin: DEFAULT_CLEAR_MARGIN,
        }
    }
}

impl Layout {
    /// Cell under a surface pixel. May be negative or past the grid bounds;
    /// the grid decides whether the cell exists. `None` for a non-finite
    /// coordinate, which names no pixel at all.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_at(&self, px: f64, py: f64) -> Option<(i64, i64)> {
        if !px.is_finite() || !py.is_finite() {
            return None;
        }
        let border = f64::from(self.border_width);
        let pitch = f64::from(self.pitch());
        let x = ((px - border) / pitch).floor() as i64;
        let y = ((py - border) / pitch).floor() as i64;
        Some((x, y))
    }

    /// Surface square drawn for cell `(x, y)`.
    #[must_use]
    pub fn cell_rect(&self, x: usize, y: usize) -> CellRect {
        let pitch = self.pitch();
        CellRect {
            x: self.offset(x),
            y: self.offset(y),
            size: pitch,
        }
    }

    /// Inclusive grid bounds `(max_x, max_y)` that fit a viewport.
    ///
    /// The drawable area is the viewport minus the clear margin and both
    /// borders, rounded down to whole cells. At least one cell always fits,
    /// and no axis exceeds [`MAX_GRID_SIDE`] cells.
    #[must_use]
    pub fn bounds_for_viewport(&self, width: u32, height: u32) -> (usize, usize) {
        (self.max_index(width), self.max_index(height))
    }

    /// Surface size in pixels needed to draw a grid with the given bounds.
    #[must_use]
    pub fn surface_size(&self, max_x: usize, max_y: usize) -> (u32, u32) {
        (
            self.offset(max_x.saturating_add(1)).saturating_add(self.border_width),
            self.offset(max_y.saturating_add(1)).saturating_add(self.border_width),
        )
    }

    fn pitch(&self) -> u32 {
        self.cell_pitch.max(1)
    }

    fn offset(&self, cells: usize) -> u32 {
        let cells = u32::try_from(cells).unwrap_or(u32::MAX);
        self.border_width
            .saturating_add(cells.saturating_mul(self.pitch()))
    }

    fn max_index(&self, extent: u32) -> usize {
        let reserved = self
            .clear_margin
            .saturating_add(self.border_width.saturating_mul(2));
        let cells = extent.saturating_sub(reserved) / self.pitch();
        usize::try_from(cells.saturating_sub(1))
            .unwrap_or(usize::MAX)
            .min(MAX_GRID_SIDE - 1)
    }
}
