//! # C Source Emitter
//!
//! Turns rendered glyph bitmaps into C source for framebuffer firmware.
//!
//! - `table`: [`GlyphTable`], the ordered de-duplicated set of rendered characters
//! - `c_source`: the lookup-table file and the standalone per-character program

pub mod table;
pub mod c_source;

pub use c_source::{emit_standalone, emit_table, standalone_file_name, EmitOptions};
pub use table::{symbol_name, GlyphTable};
