//! # Common Foundation Crate
//!
//! Shared types for the glyph generator: the top-level error type, byte
//! cursor/writer for big-endian sfnt data, and a small 2D point type used by
//! the outline rasterizer.

#![forbid(unsafe_code)]

use core::fmt;
use std::ops::Sub;
use std::path::PathBuf;

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// ParseError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur when parsing binary font data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Tried to read past the end of the buffer.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A parsed value is not valid in context.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    /// A required sfnt table is absent.
    #[error("missing table '{0}'")]
    MissingTable(&'static str),
}

// ─────────────────────────────────────────────────────────────────────────────
// GlyphgenError: top-level error type
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level error type that every crate of the generator maps into.
#[derive(Debug, Error)]
pub enum GlyphgenError {
    /// The character argument was not exactly one Unicode scalar value.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// None of the candidate font files exists on this host.
    #[error("no usable {role} font file found")]
    FontNotFound { role: &'static str },
    /// The font file exists but cannot be read, parsed or sized.
    #[error("cannot load font {}: {reason}", path.display())]
    FontLoad { path: PathBuf, reason: String },
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GlyphgenError {
    /// Build a [`GlyphgenError::FontLoad`] from any displayable cause.
    pub fn font_load(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::FontLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = GlyphgenError> = core::result::Result<T, E>;

// ─────────────────────────────────────────────────────────────────────────────
// Cursor: big-endian byte buffer reader
// ─────────────────────────────────────────────────────────────────────────────

/// A zero-copy reader over big-endian (sfnt) data.
pub struct Cursor<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at offset 0.
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, off: 0 }
    }

    /// Current read position (byte offset).
    #[inline]
    pub fn position(&self) -> usize {
        self.off
    }

    /// Number of bytes remaining from the current position.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.off)
    }

    /// Set the read position. Returns an error if out of bounds.
    #[inline]
    pub fn set_position(&mut self, pos: usize) -> Result<(), ParseError> {
        if pos > self.buf.len() {
            return Err(ParseError::UnexpectedEof);
        }
        self.off = pos;
        Ok(())
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
        let end = self.off.checked_add(N).ok_or(ParseError::UnexpectedEof)?;
        let bytes = self.buf.get(self.off..end).ok_or(ParseError::UnexpectedEof)?;
        self.off = end;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.take::<1>()?[0])
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, ParseError> {
        Ok(self.take::<1>()?[0] as i8)
    }

    #[inline]
    pub fn u16(&mut self) -> Result<u16, ParseError> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    #[inline]
    pub fn i16(&mut self) -> Result<i16, ParseError> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32, ParseError> {
        Ok(u32::from_be_bytes(self.take()?))
    }

    /// Read a 2.14 fixed-point number (composite glyph transforms).
    #[inline]
    pub fn f2dot14(&mut self) -> Result<f32, ParseError> {
        Ok(self.i16()? as f32 / 16384.0)
    }

    /// Skip `n` bytes.
    #[inline]
    pub fn skip(&mut self, n: usize) -> Result<(), ParseError> {
        let end = self.off.checked_add(n).ok_or(ParseError::UnexpectedEof)?;
        self.set_position(end)
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("off", &self.off)
            .field("len", &self.buf.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BufWriter: big-endian byte buffer writer
// ─────────────────────────────────────────────────────────────────────────────

/// A growable writer producing big-endian (sfnt) data.
#[derive(Clone, Default)]
pub struct BufWriter {
    out: Vec<u8>,
}

impl BufWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    #[inline]
    pub fn u8(&mut self, v: u8) {
        self.out.push(v);
    }

    #[inline]
    pub fn u16(&mut self, v: u16) {
        self.out.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, v: i16) {
        self.u16(v as u16);
    }

    #[inline]
    pub fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn bytes(&mut self, b: &[u8]) {
        self.out.extend_from_slice(b);
    }

    /// Pad with zero bytes until the length is a multiple of 4.
    #[inline]
    pub fn pad4(&mut self) {
        while self.out.len() % 4 != 0 {
            self.out.push(0);
        }
    }

    /// Consume the writer and return the underlying buffer.
    #[inline]
    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

impl fmt::Debug for BufWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufWriter").field("len", &self.out.len()).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vec2: 2D point
// ─────────────────────────────────────────────────────────────────────────────

/// A 2D vector (or point) with `f32` components.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Midpoint between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }
}

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec2({}, {})", self.x, self.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
