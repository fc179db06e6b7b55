//! # Font Engine
//!
//! TrueType font file parsing and glyph rasterization for the glyph
//! generator.
//!
//! - `tables`: sfnt table directory (fonts and collections), head, hhea, maxp, cmap, loca
//! - `glyph`: simple and composite glyph outlines from the `glyf` table
//! - `face`: loaded [`Font`] handles resolving characters to outlines
//! - `rasterizer`: non-zero scanline coverage with quadratic Bézier flattening
//! - `builder` (feature `test-util`): writes small TrueType files from
//!   hand-made outlines

pub mod tables;
pub mod glyph;
pub mod face;
pub mod rasterizer;
#[cfg(any(test, feature = "test-util"))]
pub mod builder;

#[cfg(any(test, feature = "test-util"))]
pub use builder::{FontBuilder, GlyphShape, GlyphSpec};
pub use face::Font;
pub use glyph::GlyphOutline;
pub use rasterizer::PixelBounds;
