//! Writing generated sources and previews.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use common::Result;
use emit::{emit_standalone, emit_table, standalone_file_name, GlyphTable};
use log::info;

use crate::config::{Output, OutputFormat, RunConfig};

/// Write the generated source(s); returns the files created.
pub fn write(config: &RunConfig, table: &GlyphTable) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    match (config.format, &config.output) {
        (OutputFormat::Table, Output::Stdout) => {
            std::io::stdout().lock().write_all(emit_table(table, &config.emit).as_bytes())?;
        }
        (OutputFormat::Table, Output::File(path) | Output::Directory(path)) => {
            fs::write(path, emit_table(table, &config.emit))?;
            written.push(path.clone());
        }
        (OutputFormat::Standalone, Output::Stdout) => {
            let mut out = std::io::stdout().lock();
            for (ch, bitmap) in table.iter() {
                out.write_all(emit_standalone(ch, bitmap, &config.emit).as_bytes())?;
                out.write_all(b"\n")?;
            }
        }
        (OutputFormat::Standalone, Output::File(dir) | Output::Directory(dir)) => {
            fs::create_dir_all(dir)?;
            for (ch, bitmap) in table.iter() {
                let path = dir.join(standalone_file_name(ch));
                fs::write(&path, emit_standalone(ch, bitmap, &config.emit))?;
                written.push(path);
            }
        }
    }
    for path in &written {
        info!("wrote {}", path.display());
    }
    Ok(written)
}

/// Text art for every glyph, with a header line per character.
pub fn preview(table: &GlyphTable, config: &RunConfig) -> String {
    let mut out = String::new();
    for (ch, bitmap) in table.iter() {
        out.push_str(&format!("U+{:04X} '{ch}'\n", ch as u32));
        out.push_str(&bitmap.ascii_art(config.emit.set_glyph, config.emit.clear_glyph));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitmap::GlyphBitmap;
    use emit::EmitOptions;
    use log::LevelFilter;

    fn config(format: OutputFormat, output: Output) -> RunConfig {
        RunConfig {
            text: Vec::new(),
            chars: Vec::new(),
            font: None,
            ascii_font: None,
            format,
            output,
            emit: EmitOptions::default(),
            preview: true,
            keep_going: false,
            log_level: LevelFilter::Off,
        }
    }

    fn table() -> GlyphTable {
        let mut t = GlyphTable::new();
        t.insert('中', GlyphBitmap::FULL);
        t.insert('A', GlyphBitmap::BLANK);
        t
    }

    #[test]
    fn table_goes_to_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.c");
        let written = write(&config(OutputFormat::Table, Output::File(path.clone())), &table()).unwrap();
        assert_eq!(written, [path.clone()]);
        let src = fs::read_to_string(path).unwrap();
        assert!(src.contains("DECL_CHARACTER(4E2D, {"));
        assert!(src.contains("DECL_CHARACTER(0041, {"));
    }

    #[test]
    fn standalone_goes_to_one_file_per_char() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("glyphs");
        let written = write(&config(OutputFormat::Standalone, Output::Directory(out.clone())), &table()).unwrap();
        assert_eq!(written, [out.join("char_4E2D.c"), out.join("char_0041.c")]);
        let src = fs::read_to_string(out.join("char_0041.c")).unwrap();
        assert!(src.contains("const uint16_t char_0041_bitmap[16]"));
    }

    #[test]
    fn preview_lists_every_glyph() {
        let text = preview(&table(), &config(OutputFormat::Table, Output::Stdout));
        assert!(text.starts_with("U+4E2D '中'\n████████████████\n"));
        assert!(text.contains("U+0041 'A'\n················\n"));
        assert_eq!(text.lines().count(), 2 * 18);
    }
}
