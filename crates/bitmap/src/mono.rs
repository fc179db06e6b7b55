//! Row-packed one-bit glyph bitmaps.

use core::fmt;

use crate::canvas::GrayCanvas;
use crate::{CANVAS_SIZE, THRESHOLD};

/// Bit of a packed row that holds column `x` (0 = leftmost): MSB-first.
///
/// Panics if `x >= 16`.
#[inline]
pub const fn column_mask(x: usize) -> u16 {
    1 << (15 - x)
}

/// A 16×16 monochrome glyph: one `u16` per row, top to bottom.
///
/// A set bit is ink. Bitmaps are immutable once built.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphBitmap {
    rows: [u16; CANVAS_SIZE],
}

impl GlyphBitmap {
    /// The all-background bitmap.
    pub const BLANK: Self = Self { rows: [0; CANVAS_SIZE] };

    /// The all-ink bitmap.
    pub const FULL: Self = Self { rows: [0xFFFF; CANVAS_SIZE] };

    pub const fn from_rows(rows: [u16; CANVAS_SIZE]) -> Self {
        Self { rows }
    }

    /// Threshold a canvas: pixels strictly below 128 become ink.
    pub fn from_canvas(canvas: &GrayCanvas) -> Self {
        let mut rows = [0u16; CANVAS_SIZE];
        for (y, row) in rows.iter_mut().enumerate() {
            *row = canvas
                .row(y)
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v < THRESHOLD)
                .fold(0, |acc, (x, _)| acc | column_mask(x));
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[u16; CANVAS_SIZE] {
        &self.rows
    }

    /// Whether pixel `(x, y)` is ink; `false` outside the bitmap.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < CANVAS_SIZE && y < CANVAS_SIZE && self.rows[y] & column_mask(x) != 0
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&r| r == 0)
    }

    /// Number of ink pixels.
    pub fn ink_count(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }

    /// One row drawn with `set` for ink and `clear` for background.
    pub fn row_art(&self, y: usize, set: char, clear: char) -> String {
        (0..CANVAS_SIZE)
            .map(|x| if self.pixel(x, y) { set } else { clear })
            .collect()
    }

    /// The whole bitmap as sixteen lines of art, each ending in `\n`.
    pub fn ascii_art(&self, set: char, clear: char) -> String {
        let mut out = String::with_capacity(CANVAS_SIZE * (CANVAS_SIZE * 3 + 1));
        for y in 0..CANVAS_SIZE {
            out.push_str(&self.row_art(y, set, clear));
            out.push('\n');
        }
        out
    }
}

impl fmt::Debug for GlyphBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows.iter().map(|r| format!("{r:#06X}")))
            .finish()
    }
}

impl fmt::Display for GlyphBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ascii_art('█', '·'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_is_leftmost_column() {
        assert_eq!(column_mask(0), 0x8000);
        assert_eq!(column_mask(15), 0x0001);
    }

    #[test]
    fn white_canvas_is_blank() {
        let bmp = GlyphBitmap::from_canvas(&GrayCanvas::new());
        assert_eq!(bmp, GlyphBitmap::BLANK);
        assert!(bmp.is_blank());
        assert_eq!(bmp.ink_count(), 0);
    }

    #[test]
    fn black_canvas_is_full() {
        let bmp = GlyphBitmap::from_canvas(&GrayCanvas::filled(0));
        assert_eq!(bmp.rows(), &[0xFFFF; 16]);
        assert_eq!(bmp.ink_count(), 256);
    }

    #[test]
    fn threshold_is_strict() {
        let mut canvas = GrayCanvas::new();
        canvas.set(0, 0, 127);
        canvas.set(1, 0, 128);
        canvas.set(15, 3, 0);
        let bmp = GlyphBitmap::from_canvas(&canvas);
        assert_eq!(bmp.rows()[0], 0x8000);
        assert_eq!(bmp.rows()[3], 0x0001);
        assert!(bmp.pixel(0, 0));
        assert!(!bmp.pixel(1, 0));
        assert!(!bmp.pixel(16, 0));
    }

    #[test]
    fn art_rendering() {
        let mut rows = [0u16; 16];
        rows[0] = 0xC001;
        let bmp = GlyphBitmap::from_rows(rows);
        assert_eq!(bmp.row_art(0, '#', '.'), "##.............#");
        let art = bmp.ascii_art('#', '.');
        assert_eq!(art.lines().count(), 16);
        assert_eq!(art.lines().nth(1), Some("................"));
        assert!(bmp.to_string().starts_with("██·"));
    }

    #[test]
    fn debug_shows_hex_rows() {
        let dbg = format!("{:?}", GlyphBitmap::FULL);
        assert!(dbg.starts_with("[\"0xFFFF\""));
    }
}
