//! Off-screen frame buffer for the 8x32 dot matrix.
//!
//! One `u32` per row.  Bit 31 is the leftmost column.  Text is built the
//! way the matrix scrolls: each glyph is OR-ed into the rightmost columns
//! and the whole buffer then shifts left by the scroll distance.

use super::font::{self, GLYPH_HEIGHT};

pub const ROWS: usize = 8;
pub const COLS: usize = 32;

/// First row occupied by a glyph (glyphs are 5 rows tall).
pub const GLYPH_TOP_ROW: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameBuffer {
    rows: [u32; ROWS],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.rows = [0; ROWS];
    }

    /// OR a glyph into the rightmost columns.
    pub fn add_char(&mut self, c: char) {
        let g = font::glyph(c);
        for (i, bits) in g.iter().enumerate().take(GLYPH_HEIGHT) {
            self.rows[GLYPH_TOP_ROW + i] |= u32::from(*bits);
        }
    }

    /// Shift every row left by `cols`; columns pushed off the left edge are lost.
    pub fn scroll(&mut self, cols: u8) {
        for row in &mut self.rows {
            *row = row.checked_shl(u32::from(cols)).unwrap_or(0);
        }
    }

    /// Clear, then lay out `text` glyph by glyph.
    pub fn compose(&mut self, text: &str, scroll_cols: u8) {
        self.clear();
        for c in text.chars() {
            self.add_char(c);
            self.scroll(scroll_cols);
        }
    }

    pub fn row(&self, index: usize) -> u32 {
        self.rows.get(index).copied().unwrap_or(0)
    }

    pub fn rows(&self) -> &[u32; ROWS] {
        &self.rows
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|r| *r == 0)
    }
}
