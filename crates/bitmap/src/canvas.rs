//! 16×16 single-channel drawing surface.

use crate::{BACKGROUND, CANVAS_SIZE, INK};

/// A grayscale canvas, row-major, one byte per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct GrayCanvas {
    pixels: [u8; CANVAS_SIZE * CANVAS_SIZE],
}

impl GrayCanvas {
    /// A canvas filled with the background value.
    pub fn new() -> Self {
        Self::filled(BACKGROUND)
    }

    pub fn filled(value: u8) -> Self {
        Self { pixels: [value; CANVAS_SIZE * CANVAS_SIZE] }
    }

    /// Pixel value at `(x, y)`, or `None` outside the canvas.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < CANVAS_SIZE && y < CANVAS_SIZE).then(|| self.pixels[y * CANVAS_SIZE + x])
    }

    /// Set a pixel; writes outside the canvas are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x < CANVAS_SIZE && y < CANVAS_SIZE {
            self.pixels[y * CANVAS_SIZE + x] = value;
        }
    }

    /// Composite ink coverage (row-major, `0.0..=1.0`) onto the canvas.
    ///
    /// A pixel with coverage `c` becomes `255 - round(255 * c)` unless it is
    /// already darker.
    pub fn draw_coverage(&mut self, coverage: &[f32]) {
        for (px, &c) in self.pixels.iter_mut().zip(coverage) {
            let shade = BACKGROUND - (c.clamp(0.0, 1.0) * (BACKGROUND - INK) as f32).round() as u8;
            *px = (*px).min(shade);
        }
    }

    /// All pixel values, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// One row of pixel values.
    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * CANVAS_SIZE..(y + 1) * CANVAS_SIZE]
    }
}

impl Default for GrayCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for GrayCanvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for y in 0..CANVAS_SIZE {
            for v in self.row(y) {
                write!(f, "{v:3} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
