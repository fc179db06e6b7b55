//! glyphgen: characters in, C framebuffer bitmaps out.

use anyhow::Context;
use clap::Parser;
use glyphgen::config::{Args, RunConfig};
use glyphgen::locator::FontCache;
use glyphgen::{driver, logger, output};

fn main() -> anyhow::Result<()> {
    let config = RunConfig::from(Args::parse());
    logger::init(config.log_level);

    let mut fonts = FontCache::new(config.locator());
    let (table, summary) = driver::run(&config, &mut fonts).context("rendering failed")?;

    if config.preview {
        print!("{}", output::preview(&table, &config));
    }
    output::write(&config, &table).context("writing output failed")?;

    if !summary.failed.is_empty() {
        log::warn!("{} characters could not be rendered", summary.failed.len());
    }
    Ok(())
}
