//! TrueType table parsing.
//!
//! Parses the sfnt table directory (plain fonts and `ttcf` collections) and
//! the tables the glyph generator needs: `head`, `hhea`, `maxp`, `cmap`
//! (formats 4 and 12) and `loca`.

use common::{Cursor, ParseError};

// ─────────────────────────────────────────────────────────────────────────────
// TableTag
// ─────────────────────────────────────────────────────────────────────────────

/// A 4-byte table tag identifying a TrueType/OpenType table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableTag(pub [u8; 4]);

impl TableTag {
    pub const HEAD: Self = Self(*b"head");
    pub const CMAP: Self = Self(*b"cmap");
    pub const GLYF: Self = Self(*b"glyf");
    pub const LOCA: Self = Self(*b"loca");
    pub const HHEA: Self = Self(*b"hhea");
    pub const HMTX: Self = Self(*b"hmtx");
    pub const MAXP: Self = Self(*b"maxp");

    /// The tag as text, for error messages.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl core::fmt::Debug for TableTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TableTag('{}')", self.as_str())
    }
}

impl core::fmt::Display for TableTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TableRecord
// ─────────────────────────────────────────────────────────────────────────────

/// A single entry in the sfnt table directory.
#[derive(Clone, Copy, Debug)]
pub struct TableRecord {
    pub tag: TableTag,
    /// Byte offset from the start of the file (also inside collections).
    pub offset: u32,
    pub length: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// FontFile
// ─────────────────────────────────────────────────────────────────────────────

const SFNT_TRUETYPE: u32 = 0x0001_0000;
const SFNT_APPLE_TRUE: u32 = 0x7472_7565; // 'true'
const SFNT_OPENTYPE_CFF: u32 = 0x4F54_544F; // 'OTTO'
const TTC_TAG: u32 = 0x7474_6366; // 'ttcf'

/// A parsed font file with access to raw table data.
pub struct FontFile<'a> {
    pub data: &'a [u8],
    pub tables: Vec<TableRecord>,
}

impl<'a> FontFile<'a> {
    /// Parse the table directory of face `face_index`.
    ///
    /// Plain font files only have face 0. For a TrueType Collection the
    /// index selects one of the faces listed in the `ttcf` header.
    pub fn parse(data: &'a [u8], face_index: u32) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let tag = c.u32()?;

        let dir_offset = if tag == TTC_TAG {
            let _version = c.u32()?;
            let num_fonts = c.u32()?;
            if face_index >= num_fonts {
                return Err(ParseError::InvalidValue("face index out of range for collection"));
            }
            c.skip(face_index as usize * 4)?;
            c.u32()? as usize
        } else if face_index != 0 {
            return Err(ParseError::InvalidValue("face index out of range for single font"));
        } else {
            0
        };

        c.set_position(dir_offset)?;
        let sfnt_version = c.u32()?;
        match sfnt_version {
            SFNT_TRUETYPE | SFNT_APPLE_TRUE => {}
            SFNT_OPENTYPE_CFF => {
                return Err(ParseError::InvalidValue("CFF outlines are not supported"));
            }
            _ => return Err(ParseError::InvalidValue("not a TrueType font")),
        }

        let num_tables = c.u16()?;
        let _search_range = c.u16()?;
        let _entry_selector = c.u16()?;
        let _range_shift = c.u16()?;

        let mut tables = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag = TableTag(c.u32()?.to_be_bytes());
            let _checksum = c.u32()?;
            let offset = c.u32()?;
            let length = c.u32()?;
            tables.push(TableRecord { tag, offset, length });
        }

        Ok(FontFile { data, tables })
    }

    /// Byte range of a table within [`FontFile::data`], if present and in bounds.
    pub fn table_range(&self, tag: TableTag) -> Option<core::ops::Range<usize>> {
        let t = self.find_table(tag)?;
        let start = t.offset as usize;
        let end = start.checked_add(t.length as usize)?;
        (end <= self.data.len()).then_some(start..end)
    }

    /// Find a table record by tag.
    pub fn find_table(&self, tag: TableTag) -> Option<&TableRecord> {
        self.tables.iter().find(|t| t.tag == tag)
    }
}

/// Number of faces in a font file: the `ttcf` count, or 1 for plain fonts.
pub fn face_count(data: &[u8]) -> Result<u32, ParseError> {
    let mut c = Cursor::new(data);
    if c.u32()? == TTC_TAG {
        let _version = c.u32()?;
        c.u32()
    } else {
        Ok(1)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HeadTable
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed `head` table.
#[derive(Clone, Debug)]
pub struct HeadTable {
    pub units_per_em: u16,
    pub index_to_loc_format: i16, // 0 = short (u16), 1 = long (u32)
}

impl HeadTable {
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _major_version = c.u16()?;
        let _minor_version = c.u16()?;
        let _font_revision = c.u32()?; // Fixed
        let _checksum_adjust = c.u32()?;
        let _magic = c.u32()?;
        let _flags = c.u16()?;
        let units_per_em = c.u16()?;
        c.skip(16)?; // created + modified (LONGDATETIME × 2)
        c.skip(8)?; // xMin, yMin, xMax, yMax
        let _mac_style = c.u16()?;
        let _lowest_rec_ppem = c.u16()?;
        let _font_direction_hint = c.i16()?;
        let index_to_loc_format = c.i16()?;

        Ok(HeadTable { units_per_em, index_to_loc_format })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HheaTable
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed `hhea` (horizontal header) table.
#[derive(Clone, Debug)]
pub struct HheaTable {
    pub ascender: i16,
}

impl HheaTable {
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _major = c.u16()?;
        let _minor = c.u16()?;
        let ascender = c.i16()?;
        Ok(HheaTable { ascender })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MaxpTable
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed `maxp` table.
#[derive(Clone, Debug)]
pub struct MaxpTable {
    pub num_glyphs: u16,
}

impl MaxpTable {
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _version = c.u32()?;
        let num_glyphs = c.u16()?;
        Ok(MaxpTable { num_glyphs })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CmapFormat4
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed `cmap` format 4 subtable (BMP character-to-glyph mapping).
#[derive(Clone, Debug)]
pub struct CmapFormat4 {
    pub seg_count: u16,
    pub end_code: Vec<u16>,
    pub start_code: Vec<u16>,
    pub id_delta: Vec<i16>,
    pub id_range_offset: Vec<u16>,
    pub glyph_id_array: Vec<u16>,
}

impl CmapFormat4 {
    /// Parse a format 4 subtable starting at its format field.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _format = c.u16()?;
        let length = c.u16()? as usize;
        let _language = c.u16()?;
        let seg_count = c.u16()? / 2;
        c.skip(6)?; // searchRange, entrySelector, rangeShift

        let read_u16s = |c: &mut Cursor<'_>| -> Result<Vec<u16>, ParseError> {
            (0..seg_count).map(|_| c.u16()).collect()
        };

        let end_code = read_u16s(&mut c)?;
        let _reserved_pad = c.u16()?;
        let start_code = read_u16s(&mut c)?;
        let id_delta = read_u16s(&mut c)?.into_iter().map(|d| d as i16).collect();
        let id_range_offset = read_u16s(&mut c)?;

        // Remaining bytes up to `length` are the glyph ID array. Some fonts
        // write a wrong length, so clamp to what is actually present.
        let glyph_count = length.saturating_sub(c.position()).min(c.remaining()) / 2;
        let mut glyph_id_array = Vec::with_capacity(glyph_count);
        for _ in 0..glyph_count {
            glyph_id_array.push(c.u16()?);
        }

        Ok(CmapFormat4 {
            seg_count,
            end_code,
            start_code,
            id_delta,
            id_range_offset,
            glyph_id_array,
        })
    }

    /// Look up a glyph ID for a BMP codepoint. Returns 0 (`.notdef`) if unmapped.
    pub fn lookup(&self, codepoint: u16) -> u16 {
        // Binary search for the first segment whose end code is >= codepoint
        let i = self.end_code.partition_point(|&end| end < codepoint);
        if i >= self.seg_count as usize || self.start_code[i] > codepoint {
            return 0;
        }

        if self.id_range_offset[i] == 0 {
            return (codepoint as i32 + self.id_delta[i] as i32) as u16;
        }

        // id_range_offset is a byte offset from its own slot; rebase it onto
        // the glyph ID array that follows the seg_count offset slots.
        let idx = self.id_range_offset[i] as usize / 2 + (codepoint - self.start_code[i]) as usize;
        let Some(array_idx) = (idx + i).checked_sub(self.seg_count as usize) else {
            return 0;
        };

        match self.glyph_id_array.get(array_idx) {
            Some(&gid) if gid != 0 => (gid as i32 + self.id_delta[i] as i32) as u16,
            _ => 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CmapFormat12
// ─────────────────────────────────────────────────────────────────────────────

/// One sequential mapping group of a format 12 subtable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequentialGroup {
    pub start_char: u32,
    pub end_char: u32,
    pub start_glyph: u32,
}

/// Parsed `cmap` format 12 subtable (full Unicode repertoire).
#[derive(Clone, Debug)]
pub struct CmapFormat12 {
    pub groups: Vec<SequentialGroup>,
}

impl CmapFormat12 {
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut c = Cursor::new(data);
        let _format = c.u16()?;
        let _reserved = c.u16()?;
        let _length = c.u32()?;
        let _language = c.u32()?;
        let num_groups = c.u32()? as usize;

        // Each group is 12 bytes; refuse counts the data cannot hold.
        if num_groups > c.remaining() / 12 {
            return Err(ParseError::UnexpectedEof);
        }

        let mut groups = Vec::with_capacity(num_groups);
        for _ in 0..num_groups {
            groups.push(SequentialGroup {
                start_char: c.u32()?,
                end_char: c.u32()?,
                start_glyph: c.u32()?,
            });
        }
        Ok(CmapFormat12 { groups })
    }

    pub fn lookup(&self, codepoint: u32) -> u16 {
        let i = self.groups.partition_point(|g| g.end_char < codepoint);
        match self.groups.get(i) {
            Some(g) if g.start_char <= codepoint => {
                u16::try_from(g.start_glyph.saturating_add(codepoint - g.start_char)).unwrap_or(0)
            }
            _ => 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CharMap
// ─────────────────────────────────────────────────────────────────────────────

/// The character map selected from a font's `cmap` table.
#[derive(Clone, Debug)]
pub enum CharMap {
    Format4(CmapFormat4),
    Format12(CmapFormat12),
}

impl CharMap {
    /// Map a character to its glyph ID; 0 (`.notdef`) when unmapped.
    pub fn lookup(&self, ch: char) -> u16 {
        let cp = ch as u32;
        match self {
            CharMap::Format4(sub) => u16::try_from(cp).map(|cp| sub.lookup(cp)).unwrap_or(0),
            CharMap::Format12(sub) => sub.lookup(cp),
        }
    }
}

/// Rank a cmap encoding record; higher is better, `None` means unusable.
fn subtable_rank(platform_id: u16, encoding_id: u16, format: u16) -> Option<u8> {
    match (platform_id, encoding_id, format) {
        (3, 10, 12) | (0, 4, 12) | (0, 6, 12) => Some(4),
        (0, _, 12) => Some(3),
        (3, 1, 4) => Some(2),
        (0, _, 4) => Some(1),
        _ => None,
    }
}

/// Find and parse the best Unicode cmap subtable.
///
/// Full-repertoire (format 12) subtables are preferred over BMP-only
/// (format 4) ones; Microsoft Unicode BMP (3, 1) is preferred over other
/// format 4 encodings.
pub fn parse_cmap(data: &[u8]) -> Result<CharMap, ParseError> {
    let mut c = Cursor::new(data);
    let _version = c.u16()?;
    let num_tables = c.u16()?;

    let mut best: Option<(u8, usize, u16)> = None;
    for _ in 0..num_tables {
        let platform_id = c.u16()?;
        let encoding_id = c.u16()?;
        let offset = c.u32()? as usize;

        let Some(format_bytes) = data.get(offset..offset + 2) else {
            continue;
        };
        let format = u16::from_be_bytes([format_bytes[0], format_bytes[1]]);

        if let Some(rank) = subtable_rank(platform_id, encoding_id, format) {
            if best.is_none_or(|(r, _, _)| rank > r) {
                best = Some((rank, offset, format));
            }
        }
    }

    let (_, offset, format) =
        best.ok_or(ParseError::InvalidValue("no suitable cmap subtable found"))?;
    let subtable = &data[offset..];

    if format == 12 {
        CmapFormat12::parse(subtable).map(CharMap::Format12)
    } else {
        CmapFormat4::parse(subtable).map(CharMap::Format4)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loca table
// ─────────────────────────────────────────────────────────────────────────────

/// Get the byte range `(start, end)` of a glyph within the `glyf` table.
///
/// `index_to_loc_format`: 0 = short (offsets are u16 × 2), 1 = long (offsets are u32).
pub fn get_glyph_offset(loca_data: &[u8], glyph_id: u16, index_to_loc_format: i16) -> Result<(u32, u32), ParseError> {
    let mut c = Cursor::new(loca_data);
    let (offset, next_offset) = if index_to_loc_format == 0 {
        c.skip(glyph_id as usize * 2)?;
        let off = c.u16()? as u32 * 2;
        let next = c.u16()? as u32 * 2;
        (off, next)
    } else {
        c.skip(glyph_id as usize * 4)?;
        let off = c.u32()?;
        let next = c.u32()?;
        (off, next)
    };

    Ok((offset, next_offset))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
