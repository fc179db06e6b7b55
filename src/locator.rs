//! Font file discovery and the per-run font cache.
//!
//! Candidate paths are plain data ([`LocatorConfig`]); the first existing
//! file among the lists that match a role and platform wins.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use common::{GlyphgenError, Result};
use font::Font;
use log::{debug, info};

// ─────────────────────────────────────────────────────────────────────────────
// Platform / FontRole
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            _ => Platform::Other,
        }
    }
}

/// Which font a character is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Everything outside ASCII; a Song/serif face with CJK coverage.
    Cjk,
    /// ASCII; a monospaced face where one is available.
    Ascii,
}

impl FontRole {
    pub fn for_char(ch: char) -> Self {
        if (ch as u32) < 128 { FontRole::Ascii } else { FontRole::Cjk }
    }

    pub fn name(self) -> &'static str {
        match self {
            FontRole::Cjk => "CJK",
            FontRole::Ascii => "ASCII",
        }
    }
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LocatorConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered font paths for one role on a set of platforms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateList {
    pub role: FontRole,
    /// Empty means every platform.
    pub platforms: Vec<Platform>,
    pub paths: Vec<PathBuf>,
}

impl CandidateList {
    fn matches(&self, role: FontRole, platform: Platform) -> bool {
        self.role == role && (self.platforms.is_empty() || self.platforms.contains(&platform))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocatorConfig {
    pub lists: Vec<CandidateList>,
}

const WINDOWS_CJK: [&str; 3] = [
    "C:/Windows/Fonts/simsun.ttc",
    "C:/Windows/Fonts/SimSun.ttf",
    "C:/Windows/Fonts/simhei.ttf",
];

const WINDOWS_ASCII: &str = "C:/Windows/Fonts/consola.ttf";

const UNIX_SERIF: [&str; 3] = [
    "/System/Library/Fonts/STSong.ttc",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
];

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

impl Default for LocatorConfig {
    fn default() -> Self {
        let unix = vec![Platform::MacOs, Platform::Linux, Platform::Other];
        LocatorConfig {
            lists: vec![
                CandidateList {
                    role: FontRole::Cjk,
                    platforms: vec![Platform::Windows],
                    paths: paths(&WINDOWS_CJK),
                },
                CandidateList {
                    role: FontRole::Ascii,
                    platforms: vec![Platform::Windows],
                    paths: std::iter::once(PathBuf::from(WINDOWS_ASCII))
                        .chain(paths(&WINDOWS_CJK))
                        .collect(),
                },
                CandidateList {
                    role: FontRole::Cjk,
                    platforms: unix.clone(),
                    paths: paths(&UNIX_SERIF),
                },
                CandidateList {
                    role: FontRole::Ascii,
                    platforms: unix,
                    paths: paths(&UNIX_SERIF),
                },
            ],
        }
    }
}

impl LocatorConfig {
    /// Try `path` before everything else for `role`, on every platform.
    pub fn prepend(&mut self, role: FontRole, path: PathBuf) {
        self.lists.insert(
            0,
            CandidateList {
                role,
                platforms: Vec::new(),
                paths: vec![path],
            },
        );
    }

    /// All candidate paths for `role` on `platform`, in priority order.
    pub fn candidates(&self, role: FontRole, platform: Platform) -> impl Iterator<Item = &Path> + '_ {
        self.lists
            .iter()
            .filter(move |l| l.matches(role, platform))
            .flat_map(|l| l.paths.iter().map(PathBuf::as_path))
    }

    /// The first candidate that exists as a file.
    pub fn locate(&self, role: FontRole, platform: Platform) -> Option<PathBuf> {
        self.candidates(role, platform)
            .find(|p| {
                let found = p.is_file();
                if !found {
                    debug!("{role} font candidate {} not found", p.display());
                }
                found
            })
            .map(Path::to_path_buf)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FontCache
// ─────────────────────────────────────────────────────────────────────────────

/// Loads each font file at most once per run.
pub struct FontCache {
    locator: LocatorConfig,
    platform: Platform,
    by_path: HashMap<PathBuf, Rc<Font>>,
    by_role: HashMap<FontRole, Rc<Font>>,
}

impl FontCache {
    pub fn new(locator: LocatorConfig) -> Self {
        Self::for_platform(locator, Platform::current())
    }

    pub fn for_platform(locator: LocatorConfig, platform: Platform) -> Self {
        Self {
            locator,
            platform,
            by_path: HashMap::new(),
            by_role: HashMap::new(),
        }
    }

    /// The font for `role`, loading it on first use.
    pub fn get(&mut self, role: FontRole) -> Result<Rc<Font>> {
        if let Some(font) = self.by_role.get(&role) {
            return Ok(Rc::clone(font));
        }

        let path = self
            .locator
            .locate(role, self.platform)
            .ok_or(GlyphgenError::FontNotFound { role: role.name() })?;

        let font = match self.by_path.get(&path).cloned() {
            Some(font) => font,
            None => {
                let font = Rc::new(load_font(&path)?);
                info!("{role} font: {} ({} glyphs)", path.display(), font.num_glyphs());
                self.by_path.insert(path, Rc::clone(&font));
                font
            }
        };
        self.by_role.insert(role, Rc::clone(&font));
        Ok(font)
    }

    /// The font for `ch`'s role.
    pub fn for_char(&mut self, ch: char) -> Result<Rc<Font>> {
        self.get(FontRole::for_char(ch))
    }
}

/// Read and parse face 0 of a font file.
pub fn load_font(path: &Path) -> Result<Font> {
    let data = std::fs::read(path).map_err(|e| GlyphgenError::font_load(path, e))?;
    Font::from_bytes(data, 0).map_err(|e| GlyphgenError::font_load(path, e))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
