//! Minimal TrueType writer.
//!
//! Builds small but valid `glyf`-flavoured font files (and `ttcf`
//! collections of them) from hand-written outlines. The workspace's tests
//! use it so they never depend on fonts installed on the host.

use common::BufWriter;

use crate::glyph::ON_CURVE_POINT;
use crate::tables::TableTag;

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const MORE_COMPONENTS: u16 = 0x0020;

/// Outline description of one glyph to write.
#[derive(Clone, Debug)]
pub enum GlyphShape {
    Empty,
    /// Contours of `(x, y, on_curve)` points in font units.
    Simple(Vec<Vec<(i32, i32, bool)>>),
    /// Components as `(character, dx, dy)`; the characters must be defined
    /// in the same builder.
    Composite(Vec<(char, i16, i16)>),
}

/// A glyph to write: its advance width and outline.
#[derive(Clone, Debug)]
pub struct GlyphSpec {
    pub advance: u16,
    pub shape: GlyphShape,
}

impl GlyphSpec {
    pub fn empty(advance: u16) -> Self {
        Self { advance, shape: GlyphShape::Empty }
    }

    pub fn simple(advance: u16, contours: Vec<Vec<(i32, i32, bool)>>) -> Self {
        Self { advance, shape: GlyphShape::Simple(contours) }
    }

    pub fn composite(advance: u16, components: Vec<(char, i16, i16)>) -> Self {
        Self { advance, shape: GlyphShape::Composite(components) }
    }
}

/// Collects glyphs and writes them out as a TrueType font.
///
/// Glyph 0 (`.notdef`) is a hollow box spanning the ascender; the other
/// glyphs get IDs in insertion order.
#[derive(Clone, Debug)]
pub struct FontBuilder {
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    glyphs: Vec<(char, GlyphSpec)>,
}

impl FontBuilder {
    pub fn new(units_per_em: u16, ascender: i16, descender: i16) -> Self {
        Self {
            units_per_em,
            ascender,
            descender,
            glyphs: Vec::new(),
        }
    }

    /// Define (or redefine) the glyph for `ch`.
    pub fn glyph(&mut self, ch: char, spec: GlyphSpec) -> &mut Self {
        match self.glyphs.iter_mut().find(|(c, _)| *c == ch) {
            Some(slot) => slot.1 = spec,
            None => self.glyphs.push((ch, spec)),
        }
        self
    }

    /// Write a single font file.
    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    /// Write a TrueType Collection holding `faces` in order.
    pub fn collection(faces: &[FontBuilder]) -> Vec<u8> {
        let header_len = 12 + 4 * faces.len();
        let mut offsets = Vec::with_capacity(faces.len());
        let mut next = header_len;
        for face in faces {
            offsets.push(next);
            // Sizes do not depend on the base offset.
            next += face.build_at(0).len().next_multiple_of(4);
        }

        let mut w = BufWriter::new();
        w.bytes(b"ttcf");
        w.u32(0x0001_0000);
        w.u32(faces.len() as u32);
        for &off in &offsets {
            w.u32(off as u32);
        }
        for (face, &off) in faces.iter().zip(&offsets) {
            w.bytes(&face.build_at(off as u32));
            w.pad4();
        }
        w.finish()
    }

    fn glyph_id(&self, ch: char) -> Option<u16> {
        self.glyphs.iter().position(|(c, _)| *c == ch).map(|i| i as u16 + 1)
    }

    fn notdef(&self) -> GlyphSpec {
        let top = self.ascender as i32;
        let em = self.units_per_em as i32;
        let (l, r) = (em / 10, em / 2);
        let t = em / 20;
        GlyphSpec::simple(
            (em * 6 / 10) as u16,
            vec![
                vec![(l, 0, true), (l, top, true), (r, top, true), (r, 0, true)],
                vec![(l + t, t, true), (r - t, t, true), (r - t, top - t, true), (l + t, top - t, true)],
            ],
        )
    }

    fn build_at(&self, base: u32) -> Vec<u8> {
        let specs: Vec<GlyphSpec> = std::iter::once(self.notdef())
            .chain(self.glyphs.iter().map(|(_, s)| s.clone()))
            .collect();

        // glyf + loca
        let mut glyf = BufWriter::new();
        let mut loca = BufWriter::new();
        let mut bbox = (i32::MAX, i32::MAX, i32::MIN, i32::MIN);
        for spec in &specs {
            loca.u32(glyf.len() as u32);
            self.write_glyph(&mut glyf, &spec.shape, &mut bbox);
            glyf.pad4();
        }
        loca.u32(glyf.len() as u32);
        if bbox.0 > bbox.2 {
            bbox = (0, 0, 0, 0);
        }

        // hmtx
        let mut hmtx = BufWriter::new();
        for spec in &specs {
            hmtx.u16(spec.advance);
            hmtx.i16(0);
        }

        let tables: Vec<(TableTag, Vec<u8>)> = vec![
            (TableTag::CMAP, self.cmap_table()),
            (TableTag::GLYF, glyf.finish()),
            (TableTag::HEAD, self.head_table(bbox)),
            (TableTag::HHEA, self.hhea_table(&specs)),
            (TableTag::HMTX, hmtx.finish()),
            (TableTag::LOCA, loca.finish()),
            (TableTag::MAXP, maxp_table(specs.len() as u16)),
        ];

        let mut w = BufWriter::new();
        let num_tables = tables.len() as u16;
        let entry_selector = 15 - num_tables.leading_zeros() as u16;
        let search_range = 16 << entry_selector;
        w.u32(0x0001_0000);
        w.u16(num_tables);
        w.u16(search_range);
        w.u16(entry_selector);
        w.u16(num_tables * 16 - search_range);

        let mut offset = 12 + 16 * tables.len();
        for (tag, data) in &tables {
            w.bytes(&tag.0);
            w.u32(checksum(data));
            w.u32(base + offset as u32);
            w.u32(data.len() as u32);
            offset += data.len().next_multiple_of(4);
        }
        for (_, data) in &tables {
            w.bytes(data);
            w.pad4();
        }
        w.finish()
    }

    fn write_glyph(&self, w: &mut BufWriter, shape: &GlyphShape, bbox: &mut (i32, i32, i32, i32)) {
        match shape {
            GlyphShape::Empty => {}
            GlyphShape::Simple(contours) => {
                let contours: Vec<&Vec<(i32, i32, bool)>> = contours.iter().filter(|c| !c.is_empty()).collect();
                let points: Vec<&(i32, i32, bool)> = contours.iter().copied().flatten().collect();
                if points.is_empty() {
                    return;
                }
                let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
                let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
                let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
                let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);
                *bbox = (bbox.0.min(x_min), bbox.1.min(y_min), bbox.2.max(x_max), bbox.3.max(y_max));

                w.i16(contours.len() as i16);
                for v in [x_min, y_min, x_max, y_max] {
                    w.i16(v as i16);
                }
                let mut end = 0u16;
                for c in contours {
                    end += c.len() as u16;
                    w.u16(end - 1);
                }
                w.u16(0); // instructionLength
                for p in &points {
                    w.u8(if p.2 { ON_CURVE_POINT } else { 0 });
                }
                let mut prev = 0;
                for p in &points {
                    w.i16((p.0 - prev) as i16);
                    prev = p.0;
                }
                prev = 0;
                for p in &points {
                    w.i16((p.1 - prev) as i16);
                    prev = p.1;
                }
            }
            GlyphShape::Composite(components) => {
                w.i16(-1);
                for _ in 0..4 {
                    w.i16(0);
                }
                for (i, &(ch, dx, dy)) in components.iter().enumerate() {
                    let mut flags = ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES;
                    if i + 1 < components.len() {
                        flags |= MORE_COMPONENTS;
                    }
                    w.u16(flags);
                    w.u16(self.glyph_id(ch).unwrap_or(0));
                    w.i16(dx);
                    w.i16(dy);
                }
            }
        }
    }

    fn head_table(&self, bbox: (i32, i32, i32, i32)) -> Vec<u8> {
        let mut w = BufWriter::new();
        w.u32(0x0001_0000); // version
        w.u32(0x0001_0000); // fontRevision
        w.u32(0); // checkSumAdjustment
        w.u32(0x5F0F_3CF5); // magicNumber
        w.u16(0); // flags
        w.u16(self.units_per_em);
        w.bytes(&[0; 16]); // created, modified
        for v in [bbox.0, bbox.1, bbox.2, bbox.3] {
            w.i16(v as i16);
        }
        w.u16(0); // macStyle
        w.u16(8); // lowestRecPPEM
        w.i16(2); // fontDirectionHint
        w.i16(1); // indexToLocFormat: long
        w.i16(0); // glyphDataFormat
        w.finish()
    }

    fn hhea_table(&self, specs: &[GlyphSpec]) -> Vec<u8> {
        let mut w = BufWriter::new();
        w.u32(0x0001_0000);
        w.i16(self.ascender);
        w.i16(self.descender);
        w.i16(0); // lineGap
        w.u16(specs.iter().map(|s| s.advance).max().unwrap_or(0));
        w.bytes(&[0; 6]); // minLeftSideBearing, minRightSideBearing, xMaxExtent
        w.i16(1); // caretSlopeRise
        w.bytes(&[0; 14]); // caretSlopeRun, caretOffset, reserved ×4, metricDataFormat
        w.u16(specs.len() as u16);
        w.finish()
    }

    fn cmap_table(&self) -> Vec<u8> {
        let mut mapping: Vec<(u32, u16)> = self
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, (ch, _))| (*ch as u32, i as u16 + 1))
            .collect();
        mapping.sort_unstable();

        let bmp: Vec<(u16, u16)> = mapping
            .iter()
            .filter_map(|&(cp, gid)| u16::try_from(cp).ok().filter(|&cp| cp != 0xFFFF).map(|cp| (cp, gid)))
            .collect();
        let format4 = format4_subtable(&bmp);
        let format12 = (mapping.iter().any(|&(cp, _)| cp > 0xFFFF)).then(|| format12_subtable(&mapping));

        let num_subtables = 1 + format12.is_some() as u16;
        let mut w = BufWriter::new();
        w.u16(0);
        w.u16(num_subtables);
        let first = 4 + 8 * num_subtables as u32;
        w.u16(3);
        w.u16(1);
        w.u32(first);
        if format12.is_some() {
            w.u16(3);
            w.u16(10);
            w.u32(first + format4.len() as u32);
        }
        w.bytes(&format4);
        if let Some(f12) = format12 {
            w.bytes(&f12);
        }
        w.finish()
    }
}

fn format4_subtable(mapping: &[(u16, u16)]) -> Vec<u8> {
    // One segment per character plus the mandatory 0xFFFF terminator.
    let seg_count = mapping.len() as u16 + 1;
    let entry_selector = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 << entry_selector;

    let mut w = BufWriter::new();
    w.u16(4);
    w.u16(16 + 8 * seg_count);
    w.u16(0); // language
    w.u16(seg_count * 2);
    w.u16(search_range);
    w.u16(entry_selector);
    w.u16(seg_count * 2 - search_range);
    for &(cp, _) in mapping {
        w.u16(cp);
    }
    w.u16(0xFFFF);
    w.u16(0); // reservedPad
    for &(cp, _) in mapping {
        w.u16(cp);
    }
    w.u16(0xFFFF);
    for &(cp, gid) in mapping {
        w.u16(gid.wrapping_sub(cp));
    }
    w.u16(1);
    for _ in 0..seg_count {
        w.u16(0);
    }
    w.finish()
}

fn format12_subtable(mapping: &[(u32, u16)]) -> Vec<u8> {
    let mut w = BufWriter::new();
    w.u16(12);
    w.u16(0);
    w.u32(16 + 12 * mapping.len() as u32);
    w.u32(0); // language
    w.u32(mapping.len() as u32);
    for &(cp, gid) in mapping {
        w.u32(cp);
        w.u32(cp);
        w.u32(gid as u32);
    }
    w.finish()
}

fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    let mut w = BufWriter::new();
    w.u32(0x0000_5000); // version 0.5
    w.u16(num_glyphs);
    w.finish()
}

/// sfnt table checksum: wrapping sum of big-endian `u32` words, zero padded.
fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{parse_cmap, CharMap, FontFile};
    use crate::Font;

    #[test]
    fn checksum_pads_tail() {
        assert_eq!(checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        assert_eq!(checksum(&[1]), 0x0100_0000);
    }

    #[test]
    fn directory_lists_all_tables() {
        let data = FontBuilder::new(1000, 800, -200).build();
        let file = FontFile::parse(&data, 0).unwrap();
        assert_eq!(file.tables.len(), 7);
        for tag in [TableTag::HEAD, TableTag::HHEA, TableTag::MAXP, TableTag::CMAP, TableTag::LOCA, TableTag::GLYF] {
            assert!(file.table_range(tag).is_some(), "missing {tag}");
        }
    }

    #[test]
    fn astral_characters_get_format12() {
        let mut b = FontBuilder::new(1000, 800, -200);
        b.glyph('A', GlyphSpec::empty(500));
        b.glyph('\u{20000}', GlyphSpec::empty(1000));
        let data = b.build();
        let file = FontFile::parse(&data, 0).unwrap();
        let cmap = parse_cmap(&data[file.table_range(TableTag::CMAP).unwrap()]).unwrap();
        assert!(matches!(cmap, CharMap::Format12(_)));
        assert_eq!(cmap.lookup('A'), 1);
        assert_eq!(cmap.lookup('\u{20000}'), 2);
    }

    #[test]
    fn redefining_a_glyph_keeps_its_id() {
        let mut b = FontBuilder::new(1000, 800, -200);
        b.glyph('A', GlyphSpec::empty(500));
        b.glyph('B', GlyphSpec::empty(500));
        b.glyph('A', GlyphSpec::simple(500, vec![vec![(0, 0, true), (0, 10, true), (10, 0, true)]]));
        let font = Font::from_bytes(b.build(), 0).unwrap();
        assert_eq!(font.glyph_index('A'), 1);
        assert_eq!(font.num_glyphs(), 3);
        assert!(font.outline(1).unwrap().is_some());
    }

    #[test]
    fn notdef_is_a_hollow_box() {
        let font = Font::from_bytes(FontBuilder::new(1000, 800, -200).build(), 0).unwrap();
        let outline = font.outline(0).unwrap().unwrap();
        assert_eq!(outline.contours.len(), 2);
        assert_eq!((outline.x_min, outline.y_max), (100, 800));
    }
}
