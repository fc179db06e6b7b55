//! Batch rendering: input collection, de-duplication and the error policy.

use std::collections::HashSet;

use bitmap::{single_char, GlyphRenderer};
use common::{GlyphgenError, Result};
use emit::GlyphTable;
use log::{debug, info, warn};

use crate::config::RunConfig;
use crate::locator::FontCache;

/// Counts for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rendered: usize,
    pub skipped_duplicates: usize,
    /// Characters that failed and were skipped (`--keep-going` only).
    pub failed: Vec<char>,
}

/// Every character to render, in input order, duplicates included.
///
/// Free text contributes each of its scalar values; every `--char` value
/// must be exactly one scalar.
pub fn collect_chars(text: &[String], chars: &[String]) -> Result<Vec<char>> {
    let mut out: Vec<char> = text.iter().flat_map(|t| t.chars()).collect();
    for arg in chars {
        out.push(single_char(arg)?);
    }
    Ok(out)
}

fn render_one(fonts: &mut FontCache, ch: char) -> Result<bitmap::GlyphBitmap> {
    let font = fonts.for_char(ch)?;
    GlyphRenderer::new(&font).render(ch)
}

/// Fonts named on the command line must exist; they never fall through to
/// the built-in candidates silently.
fn check_font_overrides(config: &RunConfig) -> Result<()> {
    for path in [&config.font, &config.ascii_font].into_iter().flatten() {
        if !path.is_file() {
            return Err(GlyphgenError::font_load(path, "no such file"));
        }
    }
    Ok(())
}

/// Render every requested character once, first occurrence first.
pub fn run(config: &RunConfig, fonts: &mut FontCache) -> Result<(GlyphTable, RunSummary)> {
    check_font_overrides(config)?;
    let chars = collect_chars(&config.text, &config.chars)?;
    if chars.is_empty() {
        return Err(GlyphgenError::InvalidInput("no characters to render".into()));
    }

    let mut seen = HashSet::new();
    let mut table = GlyphTable::new();
    let mut summary = RunSummary::default();
    let mut first_error = None;

    for ch in chars {
        if !seen.insert(ch) {
            debug!("U+{:04X} already rendered, skipping", ch as u32);
            summary.skipped_duplicates += 1;
            continue;
        }

        match render_one(fonts, ch) {
            Ok(bitmap) => {
                table.insert(ch, bitmap);
                summary.rendered += 1;
            }
            Err(e) if config.keep_going => {
                warn!("skipping U+{:04X} '{ch}': {e}", ch as u32);
                summary.failed.push(ch);
                first_error.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }

    if table.is_empty() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }

    info!(
        "rendered {} glyphs ({} duplicates, {} failed)",
        summary.rendered,
        summary.skipped_duplicates,
        summary.failed.len()
    );
    Ok((table, summary))
}
