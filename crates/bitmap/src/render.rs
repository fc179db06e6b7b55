//! Character → [`GlyphBitmap`] pipeline.
//!
//! A glyph is drawn at 14 px/em onto a white 16×16 canvas so that its ink
//! box is centered, then thresholded and row-packed. When the ink box
//! cannot be measured the glyph is drawn at a fixed offset instead.

use common::{GlyphgenError, ParseError, Vec2};
use font::{Font, GlyphOutline, PixelBounds};
use log::{debug, trace, warn};
use thiserror::Error;

use crate::canvas::GrayCanvas;
use crate::mono::GlyphBitmap;
use crate::{CANVAS_SIZE, FALLBACK_OFFSET, FONT_SIZE_PX};

/// Accept a string holding exactly one Unicode scalar value.
pub fn single_char(s: &str) -> Result<char, GlyphgenError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        (None, _) => Err(GlyphgenError::InvalidInput("expected one character, got none".into())),
        (Some(_), Some(_)) => Err(GlyphgenError::InvalidInput(format!(
            "expected one character, got {} in {s:?}",
            s.chars().count()
        ))),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Measurement
// ─────────────────────────────────────────────────────────────────────────────

/// A glyph's ink box in pixels, relative to the draw origin.
///
/// The origin is the top-left of the text line: x at the pen position, y on
/// the ascender line, y growing downward. `x1`/`y1` are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl InkBox {
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

/// Why a glyph's ink box could not be measured.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("glyph has no outline")]
    NoInk,
    #[error("glyph outline is unreadable: {0}")]
    Outline(#[from] ParseError),
}

/// Where the glyph is drawn on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Ink box centered on the canvas; `(x, y)` is the draw origin.
    Centered { x: i32, y: i32 },
    /// Measurement failed; draw at [`FALLBACK_OFFSET`].
    Fallback,
}

impl Placement {
    /// Center an ink box on the canvas, flooring odd remainders.
    pub fn centered(ink: InkBox) -> Self {
        let size = CANVAS_SIZE as i32;
        Placement::Centered {
            x: (size - ink.width()).div_euclid(2) - ink.x0,
            y: (size - ink.height()).div_euclid(2) - ink.y0,
        }
    }

    /// The draw origin on the canvas.
    pub fn offset(&self) -> (i32, i32) {
        match *self {
            Placement::Centered { x, y } => (x, y),
            Placement::Fallback => FALLBACK_OFFSET,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GlyphRenderer
// ─────────────────────────────────────────────────────────────────────────────

/// Rendering context: a font at a fixed pixel size on the 16×16 canvas.
#[derive(Clone, Copy, Debug)]
pub struct GlyphRenderer<'f> {
    font: &'f Font,
    size_px: f32,
}

impl<'f> GlyphRenderer<'f> {
    /// A renderer at the standard 14 px/em.
    pub fn new(font: &'f Font) -> Self {
        Self::with_size(font, FONT_SIZE_PX)
    }

    pub fn with_size(font: &'f Font, size_px: f32) -> Self {
        Self { font, size_px }
    }

    pub fn font(&self) -> &'f Font {
        self.font
    }

    fn scale(&self) -> f32 {
        self.font.scale_for(self.size_px)
    }

    /// Ascender line height in whole pixels.
    fn ascent_px(&self) -> i32 {
        (self.font.ascender() as f32 * self.scale()).round() as i32
    }

    fn ink_box(&self, outline: &GlyphOutline) -> InkBox {
        let b = PixelBounds::of(outline, self.scale());
        let ascent = self.ascent_px();
        InkBox {
            x0: b.left,
            y0: ascent - b.top,
            x1: b.right,
            y1: ascent - b.bottom,
        }
    }

    fn measure_outline(&self, outline: Option<&GlyphOutline>) -> Result<InkBox, MeasureError> {
        let ink = self.ink_box(outline.ok_or(MeasureError::NoInk)?);
        if ink.width() <= 0 || ink.height() <= 0 {
            return Err(MeasureError::NoInk);
        }
        Ok(ink)
    }

    /// Measure the ink box of `ch` as drawn at this renderer's size.
    pub fn measure(&self, ch: char) -> Result<InkBox, MeasureError> {
        let outline = self.font.outline(self.font.glyph_index(ch))?;
        self.measure_outline(outline.as_ref())
    }

    fn placement_for(&self, ch: char, measured: Result<InkBox, MeasureError>) -> Placement {
        match measured {
            Ok(ink) => Placement::centered(ink),
            Err(e) => {
                debug!("U+{:04X}: {e}, drawing at fixed offset {FALLBACK_OFFSET:?}", ch as u32);
                Placement::Fallback
            }
        }
    }

    /// Centered placement for `ch`, or [`Placement::Fallback`] if it cannot
    /// be measured.
    ///
    /// An undecodable outline also answers `Fallback` here, while
    /// [`draw`](Self::draw) fails on it with [`GlyphgenError::Parse`].
    pub fn placement(&self, ch: char) -> Placement {
        self.placement_for(ch, self.measure(ch))
    }

    fn paint(&self, outline: Option<&GlyphOutline>, placement: Placement) -> GrayCanvas {
        let mut canvas = GrayCanvas::new();
        if let Some(outline) = outline {
            let (x, y) = placement.offset();
            let origin = Vec2::new(x as f32, (y + self.ascent_px()) as f32);
            let coverage = font::rasterizer::rasterize_outline(outline, self.scale(), origin, CANVAS_SIZE, CANVAS_SIZE);
            canvas.draw_coverage(&coverage);
        }
        canvas
    }

    /// Draw `ch` onto a fresh canvas at its [`placement`](Self::placement).
    pub fn draw(&self, ch: char) -> Result<GrayCanvas, GlyphgenError> {
        let glyph_id = self.font.glyph_index(ch);
        if glyph_id == 0 {
            warn!("U+{:04X} is not mapped by the font, drawing .notdef", ch as u32);
        }

        let outline = self.font.outline(glyph_id)?;
        let placement = self.placement_for(ch, self.measure_outline(outline.as_ref()));
        trace!("U+{:04X}: glyph {glyph_id}, {placement:?}", ch as u32);
        Ok(self.paint(outline.as_ref(), placement))
    }

    /// Render `ch` into a row-packed monochrome bitmap.
    pub fn render(&self, ch: char) -> Result<GlyphBitmap, GlyphgenError> {
        let bitmap = GlyphBitmap::from_canvas(&self.draw(ch)?);
        debug!("rendered U+{:04X} '{ch}': {} ink pixels", ch as u32, bitmap.ink_count());
        Ok(bitmap)
    }

    /// Validate `s` as a single character and render it.
    pub fn render_str(&self, s: &str) -> Result<GlyphBitmap, GlyphgenError> {
        self.render(single_char(s)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
