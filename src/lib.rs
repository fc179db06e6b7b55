//! # glyphgen
//!
//! Renders characters into 16×16 monochrome bitmaps with a TrueType font
//! and emits them as C source for framebuffer firmware.
//!
//! - `config`: command-line arguments and [`config::RunConfig`]
//! - `locator`: candidate font paths and the per-run font cache
//! - `driver`: collects, de-duplicates and renders the requested characters
//! - `output`: writes generated sources and text previews
//! - `logger`: stderr backend for the `log` facade

pub mod config;
pub mod driver;
pub mod locator;
pub mod logger;
pub mod output;
