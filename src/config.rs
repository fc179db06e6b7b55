//! Command-line arguments and the run configuration built from them.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use emit::EmitOptions;
use log::LevelFilter;

use crate::locator::{FontRole, LocatorConfig};
use crate::logger;

/// Render characters into 16x16 monochrome bitmaps as C source.
#[derive(Parser, Debug)]
#[command(name = "glyphgen", version)]
pub struct Args {
    /// Text to render; every character becomes one glyph
    #[arg(value_name = "TEXT")]
    pub text: Vec<String>,

    /// A single character to render (repeatable)
    #[arg(short = 'c', long = "char", value_name = "CHAR")]
    pub chars: Vec<String>,

    /// Font for non-ASCII characters, tried before the built-in list
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Font for ASCII characters, tried before the built-in list
    #[arg(long, value_name = "PATH")]
    pub ascii_font: Option<PathBuf>,

    /// Output layout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Table file (default characters.c) or, for standalone, a directory
    /// (default .); `-` writes to stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Extra header to #include in generated files (repeatable)
    #[arg(long = "include", value_name = "HEADER")]
    pub includes: Vec<String>,

    /// Name of the generated lookup function
    #[arg(long, value_name = "NAME", default_value = "character_get_bitmap")]
    pub lookup_fn: String,

    /// Print every bitmap as text art
    #[arg(long)]
    pub preview: bool,

    /// Skip characters that fail instead of stopping
    #[arg(long)]
    pub keep_going: bool,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One C file with a switch-based lookup function
    Table,
    /// One self-contained C program per character
    Standalone,
}

/// Where generated source goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
    Directory(PathBuf),
}

impl Output {
    fn resolve(format: OutputFormat, path: Option<PathBuf>) -> Self {
        match (format, path) {
            (_, Some(p)) if p.as_os_str() == "-" => Output::Stdout,
            (OutputFormat::Table, Some(p)) => Output::File(p),
            (OutputFormat::Table, None) => Output::File(PathBuf::from("characters.c")),
            (OutputFormat::Standalone, Some(p)) => Output::Directory(p),
            (OutputFormat::Standalone, None) => Output::Directory(PathBuf::from(".")),
        }
    }
}

/// Everything a run needs, independent of how it was specified.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Free text, every scalar value is a glyph.
    pub text: Vec<String>,
    /// Single-character arguments, validated before rendering.
    pub chars: Vec<String>,
    pub font: Option<PathBuf>,
    pub ascii_font: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Output,
    pub emit: EmitOptions,
    pub preview: bool,
    pub keep_going: bool,
    pub log_level: LevelFilter,
}

impl RunConfig {
    /// Built-in candidate lists with the explicit font paths in front.
    pub fn locator(&self) -> LocatorConfig {
        let mut locator = LocatorConfig::default();
        if let Some(path) = &self.font {
            locator.prepend(FontRole::Cjk, path.clone());
        }
        if let Some(path) = &self.ascii_font {
            locator.prepend(FontRole::Ascii, path.clone());
        }
        locator
    }
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        RunConfig {
            output: Output::resolve(args.format, args.output),
            emit: EmitOptions {
                includes: args.includes,
                lookup_fn: args.lookup_fn,
                ..EmitOptions::default()
            },
            log_level: logger::level_for(args.verbose, args.quiet),
            text: args.text,
            chars: args.chars,
            font: args.font,
            ascii_font: args.ascii_font,
            format: args.format,
            preview: args.preview,
            keep_going: args.keep_going,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(argv: &[&str]) -> RunConfig {
        let args = Args::try_parse_from(std::iter::once("glyphgen").chain(argv.iter().copied())).unwrap();
        RunConfig::from(args)
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cfg = parse(&["中华"]);
        assert_eq!(cfg.text, ["中华"]);
        assert!(cfg.chars.is_empty());
        assert_eq!(cfg.format, OutputFormat::Table);
        assert_eq!(cfg.output, Output::File(PathBuf::from("characters.c")));
        assert_eq!(cfg.emit, EmitOptions::default());
        assert_eq!(cfg.log_level, LevelFilter::Info);
        assert!(!cfg.preview && !cfg.keep_going);
    }

    #[test]
    fn standalone_writes_to_a_directory() {
        assert_eq!(parse(&["-f", "standalone", "x"]).output, Output::Directory(PathBuf::from(".")));
        assert_eq!(
            parse(&["--format", "standalone", "-o", "out", "x"]).output,
            Output::Directory(PathBuf::from("out"))
        );
        assert_eq!(parse(&["-o", "-", "x"]).output, Output::Stdout);
    }

    #[test]
    fn repeated_options() {
        let cfg = parse(&[
            "-c", "中", "--char", "0", "--include", "freertos/FreeRTOS.h", "--include", "<string.h>",
            "--lookup-fn", "glyph_for", "-vv", "--keep-going",
        ]);
        assert_eq!(cfg.chars, ["中", "0"]);
        assert_eq!(cfg.emit.includes, ["freertos/FreeRTOS.h", "<string.h>"]);
        assert_eq!(cfg.emit.lookup_fn, "glyph_for");
        assert_eq!(cfg.log_level, LevelFilter::Trace);
        assert!(cfg.keep_going);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["glyphgen", "-v", "-q", "x"]).is_err());
        assert!(Args::try_parse_from(["glyphgen", "-f", "bdf", "x"]).is_err());
    }

    #[test]
    fn font_overrides_go_first() {
        let cfg = parse(&["--font", "/tmp/a.ttf", "--ascii-font", "/tmp/b.ttf", "x"]);
        let locator = cfg.locator();
        let platform = crate::locator::Platform::Linux;
        assert_eq!(locator.candidates(FontRole::Cjk, platform).next(), Some(PathBuf::from("/tmp/a.ttf").as_path()));
        assert_eq!(locator.candidates(FontRole::Ascii, platform).next(), Some(PathBuf::from("/tmp/b.ttf").as_path()));
    }
}
