//! Sprite and font assets
//!
//! The terminal stands in for a window, so both assets are text files:
//!
//! - A sprite is rows of characters; spaces are transparent. It is stretched
//!   over the bird's hitbox when drawn.
//! - A banner font starts with a `height N` line followed by glyph blocks, each
//!   a `glyph C` header and exactly N rows. Lines starting with `//` outside a
//!   glyph block are comments.
//!
//! Both are loaded once at startup; a missing or malformed file is fatal.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::ruleset::Ruleset;

/// Columns a character advances when the font has no glyph for it
const MISSING_GLYPH_ADVANCE: usize = 2;

/// Text-art image drawn for the bird
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl Sprite {
    pub fn parse(src: &str) -> Result<Self, String> {
        let mut rows: Vec<Vec<char>> = src
            .lines()
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();
        while rows.last().is_some_and(|row| row.iter().all(|c| *c == ' ')) {
            rows.pop();
        }
        while rows.first().is_some_and(|row| row.iter().all(|c| *c == ' ')) {
            rows.remove(0);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err("sprite has no visible rows".to_string());
        }
        Ok(Self { rows, width })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Character at a sprite cell, `None` where transparent
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        match self.rows.get(y)?.get(x) {
            Some(' ') | None => None,
            Some(&c) => Some(c),
        }
    }
}

/// One character of a banner font
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl Glyph {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        match self.rows.get(y)?.get(x) {
            Some(' ') | None => None,
            Some(&c) => Some(c),
        }
    }
}

/// Fixed-height block-letter font for text overlays
#[derive(Debug, Clone, PartialEq)]
pub struct BannerFont {
    height: usize,
    glyphs: HashMap<char, Glyph>,
}

impl BannerFont {
    pub fn parse(src: &str) -> Result<Self, String> {
        let mut lines = src.lines().map(|l| l.trim_end_matches('\r')).enumerate();

        let height = loop {
            let Some((n, line)) = lines.next() else {
                return Err("missing `height` line".to_string());
            };
            if is_skippable(line) {
                continue;
            }
            let value = line
                .strip_prefix("height ")
                .ok_or_else(|| format!("line {}: expected `height N`", n + 1))?;
            match value.trim().parse::<usize>() {
                Ok(h) if h > 0 => break h,
                _ => return Err(format!("line {}: invalid height `{}`", n + 1, value.trim())),
            }
        };

        let mut glyphs = HashMap::new();
        while let Some((n, line)) = lines.next() {
            if is_skippable(line) {
                continue;
            }
            let rest = line
                .strip_prefix("glyph ")
                .ok_or_else(|| format!("line {}: expected `glyph C`", n + 1))?;
            let mut chars = rest.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(format!("line {}: glyph name must be one character", n + 1)),
            };

            let mut rows = Vec::with_capacity(height);
            for _ in 0..height {
                let Some((_, row)) = lines.next() else {
                    return Err(format!("glyph `{}` is missing rows", ch));
                };
                rows.push(row.chars().collect::<Vec<char>>());
            }
            let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
            if glyphs.insert(ch, Glyph { rows, width }).is_some() {
                return Err(format!("line {}: duplicate glyph `{}`", n + 1, ch));
            }
        }

        if glyphs.is_empty() {
            return Err("font defines no glyphs".to_string());
        }
        Ok(Self { height, glyphs })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Glyph for `ch`, falling back to its uppercase form
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs
            .get(&ch)
            .or_else(|| ch.to_uppercase().next().and_then(|up| self.glyphs.get(&up)))
    }

    /// Horizontal advance of one character (glyph width, or a blank gap)
    pub fn advance(&self, ch: char) -> usize {
        self.glyph(ch).map_or(MISSING_GLYPH_ADVANCE, Glyph::width)
    }

    /// Columns needed to draw `text` with one blank column between glyphs
    pub fn measure(&self, text: &str) -> usize {
        let count = text.chars().count();
        if count == 0 {
            return 0;
        }
        text.chars().map(|c| self.advance(c)).sum::<usize>() + count - 1
    }
}

fn is_skippable(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with("//")
}

/// Which asset failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Sprite,
    Font,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sprite => write!(f, "sprite"),
            Self::Font => write!(f, "font"),
        }
    }
}

/// Startup asset failure
#[derive(Debug)]
pub enum AssetError {
    Io {
        kind: AssetKind,
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        kind: AssetKind,
        path: PathBuf,
        reason: String,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { kind, path, source } => {
                write!(f, "unable to load {} {}: {}", kind, path.display(), source)
            }
            Self::Parse { kind, path, reason } => {
                write!(f, "malformed {} {}: {}", kind, path.display(), reason)
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

/// Everything loaded from disk before the first frame
#[derive(Debug, Clone)]
pub struct Assets {
    pub sprite: Sprite,
    pub font: BannerFont,
}

impl Assets {
    /// Load the sprite and font named by a ruleset
    pub fn for_ruleset(ruleset: &Ruleset) -> Result<Self, AssetError> {
        Self::load(&ruleset.sprite_path, &ruleset.font_path)
    }

    pub fn load(sprite_path: &Path, font_path: &Path) -> Result<Self, AssetError> {
        let sprite = load_with(AssetKind::Sprite, sprite_path, Sprite::parse)?;
        let font = load_with(AssetKind::Font, font_path, BannerFont::parse)?;
        log::info!(
            "Loaded {}x{} sprite and {}-row font ({} glyphs)",
            sprite.width(),
            sprite.height(),
            font.height(),
            font.glyphs.len()
        );
        Ok(Self { sprite, font })
    }
}

fn load_with<T>(
    kind: AssetKind,
    path: &Path,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, AssetError> {
    let src = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    parse(&src).map_err(|reason| AssetError::Parse {
        kind,
        path: path.to_path_buf(),
        reason,
    })
}
