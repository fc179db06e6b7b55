//! Loaded font faces.
//!
//! [`Font`] owns the file bytes and the parsed metadata the glyph generator
//! needs, and resolves characters to fully flattened outlines (composite
//! glyphs included).

use std::ops::Range;

use common::ParseError;
use log::trace;

use crate::glyph::{parse_glyph, GlyphDesc, GlyphOutline};
use crate::tables::{self, CharMap, FontFile, HeadTable, HheaTable, MaxpTable, TableTag};

/// Composite glyphs nested deeper than this are treated as malformed.
const MAX_COMPOSITE_DEPTH: u8 = 8;

/// A TrueType face loaded into memory.
///
/// The handle is read-only after loading and can be shared freely.
pub struct Font {
    data: Vec<u8>,
    units_per_em: u16,
    ascender: i16,
    num_glyphs: u16,
    index_to_loc_format: i16,
    cmap: CharMap,
    loca: Range<usize>,
    glyf: Range<usize>,
}

fn required(file: &FontFile<'_>, tag: TableTag, name: &'static str) -> Result<Range<usize>, ParseError> {
    file.table_range(tag).ok_or(ParseError::MissingTable(name))
}

impl Font {
    /// Parse face `face_index` of a font file (0 for plain `.ttf` files).
    pub fn from_bytes(data: Vec<u8>, face_index: u32) -> Result<Self, ParseError> {
        let (head, hhea, maxp, cmap, loca, glyf) = {
            let file = FontFile::parse(&data, face_index)?;
            (
                HeadTable::parse(&data[required(&file, TableTag::HEAD, "head")?])?,
                HheaTable::parse(&data[required(&file, TableTag::HHEA, "hhea")?])?,
                MaxpTable::parse(&data[required(&file, TableTag::MAXP, "maxp")?])?,
                tables::parse_cmap(&data[required(&file, TableTag::CMAP, "cmap")?])?,
                required(&file, TableTag::LOCA, "loca")?,
                required(&file, TableTag::GLYF, "glyf")?,
            )
        };

        if !(16..=16384).contains(&head.units_per_em) {
            return Err(ParseError::InvalidValue("units per em out of range"));
        }

        trace!(
            "font face {face_index}: {} glyphs, {} units/em, ascender {}",
            maxp.num_glyphs, head.units_per_em, hhea.ascender
        );

        Ok(Font {
            units_per_em: head.units_per_em,
            ascender: hhea.ascender,
            num_glyphs: maxp.num_glyphs,
            index_to_loc_format: head.index_to_loc_format,
            cmap,
            loca,
            glyf,
            data,
        })
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    /// Typographic ascender in font units.
    pub fn ascender(&self) -> i16 {
        self.ascender
    }

    /// Font-units-to-pixels factor for a size in pixels per em.
    pub fn scale_for(&self, size_px: f32) -> f32 {
        size_px / self.units_per_em as f32
    }

    /// Glyph ID for a character; 0 (`.notdef`) when the font lacks it.
    pub fn glyph_index(&self, ch: char) -> u16 {
        self.cmap.lookup(ch)
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyph_index(ch) != 0
    }

    /// The flattened outline of a glyph, or `None` if it has no contours.
    pub fn outline(&self, glyph_id: u16) -> Result<Option<GlyphOutline>, ParseError> {
        self.resolve(glyph_id, 0)
    }

    fn glyph_data(&self, glyph_id: u16) -> Result<&[u8], ParseError> {
        if glyph_id >= self.num_glyphs {
            return Err(ParseError::InvalidValue("glyph id out of range"));
        }
        let loca = &self.data[self.loca.clone()];
        let glyf = &self.data[self.glyf.clone()];
        let (start, end) = tables::get_glyph_offset(loca, glyph_id, self.index_to_loc_format)?;
        if end <= start {
            return Ok(&[]);
        }
        glyf.get(start as usize..end as usize).ok_or(ParseError::UnexpectedEof)
    }

    fn resolve(&self, glyph_id: u16, depth: u8) -> Result<Option<GlyphOutline>, ParseError> {
        if depth > MAX_COMPOSITE_DEPTH {
            return Err(ParseError::InvalidValue("composite glyph nesting too deep"));
        }

        match parse_glyph(self.glyph_data(glyph_id)?)? {
            GlyphDesc::Empty => Ok(None),
            GlyphDesc::Simple(outline) => Ok((!outline.is_empty()).then_some(outline)),
            GlyphDesc::Composite(components) => {
                let mut merged: Option<GlyphOutline> = None;
                for comp in &components {
                    if let Some(part) = self.resolve(comp.glyph_id, depth + 1)? {
                        let part = part.transformed(comp);
                        merged = Some(match merged {
                            Some(acc) => acc.merge(part),
                            None => part,
                        });
                    }
                }
                Ok(merged)
            }
        }
    }
}

impl core::fmt::Debug for Font {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Font")
            .field("units_per_em", &self.units_per_em)
            .field("num_glyphs", &self.num_glyphs)
            .field("bytes", &self.data.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{FontBuilder, GlyphSpec};
    use crate::glyph::OutlinePoint;

    fn square(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Vec<(i32, i32, bool)>> {
        vec![vec![(x0, y0, true), (x0, y1, true), (x1, y1, true), (x1, y0, true)]]
    }

    fn sample_font() -> Vec<u8> {
        let mut b = FontBuilder::new(1000, 800, -200);
        b.glyph('A', GlyphSpec::simple(600, square(100, 0, 500, 700)));
        b.glyph(' ', GlyphSpec::empty(300));
        b.glyph('B', GlyphSpec::composite(600, vec![('A', 50, -10)]));
        b.build()
    }

    #[test]
    fn loads_metrics() {
        let font = Font::from_bytes(sample_font(), 0).unwrap();
        assert_eq!(font.units_per_em(), 1000);
        assert_eq!(font.ascender(), 800);
        assert_eq!(font.num_glyphs(), 4); // .notdef + 3
        assert_eq!(font.scale_for(14.0), 0.014);
    }

    #[test]
    fn maps_characters() {
        let font = Font::from_bytes(sample_font(), 0).unwrap();
        assert!(font.has_glyph('A'));
        assert!(font.has_glyph(' '));
        assert!(!font.has_glyph('中'));
        assert_eq!(font.glyph_index('中'), 0);
    }

    #[test]
    fn simple_and_empty_outlines() {
        let font = Font::from_bytes(sample_font(), 0).unwrap();
        let a = font.outline(font.glyph_index('A')).unwrap().unwrap();
        assert_eq!((a.x_min, a.y_min, a.x_max, a.y_max), (100, 0, 500, 700));
        assert!(font.outline(font.glyph_index(' ')).unwrap().is_none());
    }

    #[test]
    fn composite_outline_is_offset() {
        let font = Font::from_bytes(sample_font(), 0).unwrap();
        let b = font.outline(font.glyph_index('B')).unwrap().unwrap();
        assert_eq!((b.x_min, b.y_min, b.x_max, b.y_max), (150, -10, 550, 690));
        assert_eq!(b.contours[0].points[0], OutlinePoint { x: 150, y: -10, on_curve: true });
    }

    #[test]
    fn glyph_id_out_of_range() {
        let font = Font::from_bytes(sample_font(), 0).unwrap();
        assert!(font.outline(99).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Font::from_bytes(vec![0; 64], 0).is_err());
        assert!(Font::from_bytes(Vec::new(), 0).is_err());
    }

    #[test]
    fn collection_faces() {
        let mut light = FontBuilder::new(1000, 800, -200);
        light.glyph('A', GlyphSpec::simple(600, square(0, 0, 100, 100)));
        let mut bold = FontBuilder::new(2048, 1600, -400);
        bold.glyph('A', GlyphSpec::simple(600, square(0, 0, 300, 300)));
        let ttc = FontBuilder::collection(&[light, bold]);

        assert_eq!(tables::face_count(&ttc).unwrap(), 2);
        let f0 = Font::from_bytes(ttc.clone(), 0).unwrap();
        let f1 = Font::from_bytes(ttc.clone(), 1).unwrap();
        assert_eq!(f0.units_per_em(), 1000);
        assert_eq!(f1.units_per_em(), 2048);
        assert_eq!(f1.outline(f1.glyph_index('A')).unwrap().unwrap().x_max, 300);
        assert!(Font::from_bytes(ttc, 2).is_err());
    }
}
