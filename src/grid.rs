//! Cell store for one room's pixel grid.
//!
//! The grid is a plain data structure: rows of [`ColorCode`] with inclusive
//! bounds `0..=max_x` by `0..=max_y`. It performs no I/O and knows nothing
//! about rooms or the wire, so the session can rebuild or replace it freely.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use sdap::{ColorCode, GridSnapshot};

/// Largest number of cells along either axis. Bounds past it are clamped, and
/// snapshots that exceed it are refused.
pub const MAX_GRID_SIDE: usize = 1024;

/// Mutable 2D store of cell colors with fixed bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Cells indexed `[y][x]`. Every row has `max_x + 1` entries.
    rows: Vec<Vec<ColorCode>>,
    max_x: usize,
    max_y: usize,
}

impl Grid {
    /// Build an all-background grid covering `0..=max_x` by `0..=max_y`,
    /// each bound clamped to [`MAX_GRID_SIDE`] cells.
    #[must_use]
    pub fn new(max_x: usize, max_y: usize) -> Self {
        let (max_x, max_y) = (clamp_bound(max_x), clamp_bound(max_y));
        Self {
            rows: vec![vec![ColorCode::BACKGROUND; max_x + 1]; max_y + 1],
            max_x,
            max_y,
        }
    }

    /// Build a grid from server-provided rows.
    ///
    /// Width comes from the widest row; shorter rows are padded with
    /// background. An empty snapshot yields a single background cell.
    /// Returns `None` when either side exceeds [`MAX_GRID_SIDE`].
    #[must_use]
    pub fn from_snapshot(snapshot: GridSnapshot) -> Option<Self> {
        let width = snapshot.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let height = snapshot.len().max(1);
        if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
            return None;
        }
        let mut grid = Self::new(width - 1, height - 1);
        for (y, row) in snapshot.into_iter().enumerate() {
            for (x, code) in row.into_iter().enumerate() {
                grid.rows[y][x] = code;
            }
        }
        Some(grid)
    }

    #[must_use]
    pub fn max_x(&self) -> usize {
        self.max_x
    }

    #[must_use]
    pub fn max_y(&self) -> usize {
        self.max_y
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.max_x + 1
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.max_y + 1
    }

    /// Reallocate to new bounds, keeping every cell that lies inside both the
    /// old and the new bounds. Cells that become newly in-bounds are background.
    /// Bounds are clamped as in [`Grid::new`].
    pub fn resize(&mut self, new_max_x: usize, new_max_y: usize) {
        let (new_max_x, new_max_y) = (clamp_bound(new_max_x), clamp_bound(new_max_y));
        let mut rows = vec![vec![ColorCode::BACKGROUND; new_max_x + 1]; new_max_y + 1];
        for (new_row, old_row) in rows.iter_mut().zip(&self.rows) {
            let keep = new_row.len().min(old_row.len());
            new_row[..keep].copy_from_slice(&old_row[..keep]);
        }
        self.rows = rows;
        self.max_x = new_max_x;
        self.max_y = new_max_y;
    }

    /// Set one cell from signed input coordinates.
    ///
    /// Returns `false` without mutating when `(x, y)` is outside the bounds.
    pub fn set_cell(&mut self, x: i64, y: i64, code: ColorCode) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        self.set(x, y, code)
    }

    /// Set one cell addressed by non-negative coordinates.
    pub fn set(&mut self, x: usize, y: usize, code: ColorCode) -> bool {
        if x > self.max_x || y > self.max_y {
            return false;
        }
        self.rows[y][x] = code;
        true
    }

    /// Color at `(x, y)`; background for coordinates outside the bounds.
    #[must_use]
    pub fn get_cell(&self, x: usize, y: usize) -> ColorCode {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(ColorCode::BACKGROUND)
    }

    /// Row-major traversal yielding `(x, y, code)` for every cell.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, ColorCode)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, code)| (x, y, *code))
        })
    }

    /// Copy of the cell rows in wire order.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        self.rows.clone()
    }
}

fn clamp_bound(max_index: usize) -> usize {
    max_index.min(MAX_GRID_SIDE - 1)
}
