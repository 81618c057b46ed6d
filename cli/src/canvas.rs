//! Text rendering of the grid for the terminal.
//!
//! The canvas only knows what the session told it through [`RenderSink`]; it
//! never reads the grid except on a full redraw.

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

use pixelroom::{ColorCode, Grid, Layout, RenderSink};
use tracing::trace;

pub struct TextCanvas {
    layout: Layout,
    /// Cells indexed `[y][x]` as last painted.
    rows: Vec<Vec<ColorCode>>,
    room: Option<String>,
}

impl TextCanvas {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self { layout, rows: Vec::new(), room: None }
    }

    #[must_use]
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// One line per row, one glyph per cell, under a title line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let width = self.rows.first().map_or(0, Vec::len);
        let title = format!(
            "room {} ({}x{} cells)",
            self.room.as_deref().unwrap_or("-"),
            width,
            self.rows.len()
        );
        let mut out = title;
        for row in &self.rows {
            out.push('\n');
            out.extend(row.iter().map(|code| glyph(*code)));
        }
        out
    }
}

impl RenderSink for TextCanvas {
    fn draw_cell(&mut self, x: usize, y: usize, color: ColorCode) {
        let rect = self.layout.cell_rect(x, y);
        trace!(x, y, px = rect.x, py = rect.y, size = rect.size, "canvas: paint cell");
        if self.rows.len() <= y {
            let width = self.rows.first().map_or(x + 1, Vec::len);
            self.rows.resize(y + 1, vec![ColorCode::BACKGROUND; width]);
        }
        let row = &mut self.rows[y];
        if row.len() <= x {
            row.resize(x + 1, ColorCode::BACKGROUND);
        }
        row[x] = color;
    }

    fn redraw(&mut self, grid: &Grid) {
        trace!(max_x = grid.max_x(), max_y = grid.max_y(), "canvas: redraw");
        self.rows = grid.snapshot();
    }

    fn room_changed(&mut self, name: &str) {
        self.room = Some(name.to_owned());
    }
}

fn glyph(code: ColorCode) -> char {
    match code {
        ColorCode::WHITE => '.',
        ColorCode::RED => 'R',
        ColorCode::BLUE => 'B',
        _ => '#',
    }
}
