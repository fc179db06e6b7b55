//! # Monochrome Glyph Bitmaps
//!
//! Renders single characters into 16×16 one-bit bitmaps for framebuffer
//! fonts.
//!
//! - `canvas`: the 16×16 grayscale drawing surface
//! - `mono`: [`GlyphBitmap`], sixteen row-packed `u16` values
//! - `render`: placement (centered or fixed fallback) and the full render pipeline
//!
//! Rows are packed MSB-first: column 0 (leftmost) is bit 15.

pub mod canvas;
pub mod mono;
pub mod render;

pub use canvas::GrayCanvas;
pub use mono::{column_mask, GlyphBitmap};
pub use render::{single_char, GlyphRenderer, InkBox, MeasureError, Placement};

/// Width and height of the canvas and of every bitmap, in pixels.
pub const CANVAS_SIZE: usize = 16;

/// Rendering size in pixels per em.
pub const FONT_SIZE_PX: f32 = 14.0;

/// Canvas value of untouched pixels (white).
pub const BACKGROUND: u8 = 255;

/// Canvas value of fully inked pixels (black).
pub const INK: u8 = 0;

/// Pixels strictly below this value count as ink.
pub const THRESHOLD: u8 = 128;

/// Draw offset used when the glyph's ink box cannot be measured.
pub const FALLBACK_OFFSET: (i32, i32) = (2, 1);
