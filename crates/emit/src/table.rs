//! Ordered glyph collection.

use bitmap::GlyphBitmap;

/// C identifier fragment for a character: its code point in uppercase hex,
/// zero-padded to four digits.
pub fn symbol_name(ch: char) -> String {
    format!("{:04X}", ch as u32)
}

/// Rendered glyphs in first-seen order, at most one entry per character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphTable {
    entries: Vec<(char, GlyphBitmap)>,
}

impl GlyphTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a glyph. Returns `false` and keeps the existing entry when `ch`
    /// is already present.
    pub fn insert(&mut self, ch: char, bitmap: GlyphBitmap) -> bool {
        if self.contains(ch) {
            return false;
        }
        self.entries.push((ch, bitmap));
        true
    }

    pub fn contains(&self, ch: char) -> bool {
        self.entries.iter().any(|&(c, _)| c == ch)
    }

    pub fn get(&self, ch: char) -> Option<&GlyphBitmap> {
        self.entries.iter().find(|&&(c, _)| c == ch).map(|(_, b)| b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &GlyphBitmap)> + '_ {
        self.entries.iter().map(|(c, b)| (*c, b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any character needs more than 16 bits.
    pub fn has_astral(&self) -> bool {
        self.entries.iter().any(|&(c, _)| c as u32 > 0xFFFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_names_are_padded_upper_hex() {
        assert_eq!(symbol_name('中'), "4E2D");
        assert_eq!(symbol_name('0'), "0030");
        assert_eq!(symbol_name('\u{1F600}'), "1F600");
    }

    #[test]
    fn first_occurrence_wins() {
        let mut t = GlyphTable::new();
        assert!(t.insert('中', GlyphBitmap::FULL));
        assert!(t.insert('华', GlyphBitmap::BLANK));
        assert!(!t.insert('中', GlyphBitmap::BLANK));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get('中'), Some(&GlyphBitmap::FULL));
        let order: Vec<char> = t.iter().map(|(c, _)| c).collect();
        assert_eq!(order, ['中', '华']);
    }

    #[test]
    fn astral_detection() {
        let mut t = GlyphTable::new();
        assert!(t.is_empty());
        t.insert('A', GlyphBitmap::BLANK);
        assert!(!t.has_astral());
        t.insert('\u{20000}', GlyphBitmap::BLANK);
        assert!(t.has_astral());
    }
}
