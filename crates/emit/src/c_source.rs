//! C source templates.
//!
//! Both templates store each glyph as `static const uint16_t[16]`, one row
//! per element, column 0 in bit 15. Output is deterministic: the same table
//! and options always produce the same text.

use bitmap::{GlyphBitmap, CANVAS_SIZE};
use log::debug;

use crate::table::{symbol_name, GlyphTable};

/// Formatting knobs shared by both templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Glyph used for ink pixels in row comments.
    pub set_glyph: char,
    /// Glyph used for background pixels in row comments.
    pub clear_glyph: char,
    /// Extra `#include` lines, written after the standard headers. A bare
    /// name is quoted; `<...>` and `"..."` are kept as given.
    pub includes: Vec<String>,
    /// Name of the table lookup function.
    pub lookup_fn: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            set_glyph: '█',
            clear_glyph: '·',
            includes: Vec::new(),
            lookup_fn: "character_get_bitmap".to_string(),
        }
    }
}

impl EmitOptions {
    fn include_lines(&self, standard: &[&str]) -> String {
        let mut out = String::new();
        for header in standard {
            out.push_str(&format!("#include <{header}>\n"));
        }
        for header in &self.includes {
            let header = header.trim();
            if header.starts_with('<') || header.starts_with('"') {
                out.push_str(&format!("#include {header}\n"));
            } else {
                out.push_str(&format!("#include \"{header}\"\n"));
            }
        }
        out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// `U+4E2D '中'`, or just `U+000A` for characters that would break a line.
fn describe(ch: char) -> String {
    if ch.is_control() {
        format!("U+{:04X}", ch as u32)
    } else {
        format!("U+{:04X} '{ch}'", ch as u32)
    }
}

/// Escape a character for use inside a C `printf` format string.
fn printf_literal(ch: char) -> String {
    match ch {
        '\\' => "\\\\".to_string(),
        '"' => "\\\"".to_string(),
        '%' => "%%".to_string(),
        c if c.is_control() => "?".to_string(),
        c => c.to_string(),
    }
}

/// Sixteen `0xXXXX` initializers with a drawing of each row, at `indent`.
fn bitmap_rows(bitmap: &GlyphBitmap, indent: &str, opts: &EmitOptions) -> String {
    let mut out = String::new();
    for (y, row) in bitmap.rows().iter().enumerate() {
        let comma = if y + 1 < CANVAS_SIZE { "," } else { " " };
        out.push_str(&format!(
            "{indent}0x{row:04X}{comma}  // row {:2}: {}\n",
            y + 1,
            bitmap.row_art(y, opts.set_glyph, opts.clear_glyph)
        ));
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Lookup table
// ─────────────────────────────────────────────────────────────────────────────

/// One C file with every glyph of `table` behind a `switch` lookup.
///
/// Unknown codes return `NULL`. The parameter is `uint16_t` unless a glyph
/// lies outside the Basic Multilingual Plane, then `uint32_t`.
pub fn emit_table(table: &GlyphTable, opts: &EmitOptions) -> String {
    let code_type = if table.has_astral() { "uint32_t" } else { "uint16_t" };
    let mut out = String::new();

    out.push_str(&format!(
        "// {} glyphs, 16x16 pixels, one uint16_t per row, bit 15 = leftmost column.\n\n",
        table.len()
    ));
    out.push_str(&opts.include_lines(&["stddef.h", "stdint.h"]));
    out.push('\n');
    out.push_str(concat!(
        "#define DECL_CHARACTER(name, ...) \\\n",
        "    static const uint16_t char_##name##_bitmap[16] = __VA_ARGS__; \\\n",
        "    case 0x##name: \\\n",
        "        return char_##name##_bitmap;\n\n",
    ));
    out.push_str(&format!(
        "const uint16_t* {}({code_type} character) {{\n    switch (character) {{\n",
        opts.lookup_fn
    ));

    for (ch, bitmap) in table.iter() {
        out.push_str(&format!("        // {}\n", describe(ch)));
        out.push_str(&format!("        DECL_CHARACTER({}, {{\n", symbol_name(ch)));
        out.push_str(&bitmap_rows(bitmap, "            ", opts));
        out.push_str("        })\n");
    }

    out.push_str("\n        default:\n            return NULL;\n    }\n}\n");
    debug!("emitted lookup table with {} glyphs ({} bytes)", table.len(), out.len());
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Standalone program
// ─────────────────────────────────────────────────────────────────────────────

/// File name conventionally used for [`emit_standalone`] output.
pub fn standalone_file_name(ch: char) -> String {
    format!("char_{}.c", symbol_name(ch))
}

/// A self-contained C program for one glyph: the bitmap array, a
/// box-drawing printer, a bounds-checked pixel accessor and a `main`.
pub fn emit_standalone(ch: char, bitmap: &GlyphBitmap, opts: &EmitOptions) -> String {
    let name = format!("char_{}", symbol_name(ch));
    let code = ch as u32;
    let shown = printf_literal(ch);
    let mut out = String::new();

    out.push_str(&format!("// {}: 16x16 monochrome bitmap\n\n", describe(ch)));
    out.push_str(&opts.include_lines(&["stdio.h", "stdint.h"]));
    out.push('\n');

    out.push_str("// one uint16_t per row, bit 15 = leftmost column\n");
    out.push_str(&format!("const uint16_t {name}_bitmap[16] = {{\n"));
    out.push_str(&bitmap_rows(bitmap, "    ", opts));
    out.push_str("};\n\n");

    out.push_str(&format!(
        r#"void display_{name}(void) {{
    printf("Character '{shown}' (U+{code:04X}) as a 16x16 bitmap:\n");
    printf("┌");
    for (int i = 0; i < 16; i++) printf("─");
    printf("┐\n");

    for (int row = 0; row < 16; row++) {{
        printf("│");
        for (int col = 0; col < 16; col++) {{
            if ({name}_bitmap[row] & (1 << (15 - col))) {{
                printf("█");
            }} else {{
                printf(" ");
            }}
        }}
        printf("│\n");
    }}

    printf("└");
    for (int i = 0; i < 16; i++) printf("─");
    printf("┘\n");
}}

// 1 = ink, 0 = background or out of range
int get_pixel_{name}(int x, int y) {{
    if (x < 0 || x >= 16 || y < 0 || y >= 16) return 0;
    return ({name}_bitmap[y] & (1 << (15 - x))) ? 1 : 0;
}}

int main(void) {{
    display_{name}();
    printf("\nPixel (8, 8): %d\n", get_pixel_{name}(8, 8));
    return 0;
}}
"#
    ));
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
