//! Grid dimensions chosen by the host.

use crate::{DEFAULT_ROWS, DEFAULT_WINDOW_WIDTH};

/// Rows per side and the pixel width of the square window the grid fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub rows: i32,
    pub window_width: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            window_width: DEFAULT_WINDOW_WIDTH,
        }
    }
}

impl GridConfig {
    pub fn new(rows: i32, window_width: u32) -> Self {
        Self { rows, window_width }
    }

    /// Pixel width of a single cell. Zero for a non-positive row count.
    pub fn cell_width(&self) -> u32 {
        if self.rows <= 0 {
            0
        } else {
            self.window_width / self.rows as u32
        }
    }
}
