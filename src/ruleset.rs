//! Game rules and presentation settings
//!
//! Both game variants are the same simulation with different constants. A
//! `Ruleset` carries every tunable; `Variant` picks one of the built-in presets.
//! Rulesets can also be loaded from JSON, where any field left out falls back
//! to the preset named by the file's `variant` key.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::*;
use crate::renderer::Rgb;
use crate::sim::PipeLayout;

/// Built-in rule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Fast, heavy bird on a cyan sky; no score
    Classic,
    /// Floaty bird on a black sky with a score counter
    #[default]
    Scored,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Scored => "scored",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "plain" => Some(Variant::Classic),
            "scored" | "score" => Some(Variant::Scored),
            _ => None,
        }
    }
}

/// Colors used when drawing a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub sky: Rgb,
    pub pipe: Rgb,
    pub bird: Rgb,
    pub game_over: Rgb,
    pub score: Rgb,
}

/// Complete description of one way to play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub variant: Variant,
    pub title: String,

    // === World ===
    pub window_width: f32,
    pub window_height: f32,

    // === Physics (per tick) ===
    /// Added to the bird's velocity every tick
    pub gravity: f32,
    /// Velocity the bird is set to on a flap (negative = up)
    pub jump_impulse: f32,
    /// Leftward pipe movement per tick
    pub pipe_speed: f32,

    // === Pipes ===
    pub pipe_width: f32,
    pub pipe_gap: f32,
    pub pipe_count: usize,
    pub pipe_spacing: f32,
    pub pipe_margin: f32,

    // === Bird ===
    /// Top-left corner at the start of a run
    pub bird_start: Vec2,
    /// Hitbox extent (sprite size after scaling)
    pub bird_size: Vec2,

    // === Scoring ===
    pub scoring: bool,
    /// How far behind the bird's left edge a pipe must be before it counts
    pub score_offset: f32,
    pub score_label: String,
    pub score_pos: Vec2,

    // === Presentation ===
    pub game_over_text: String,
    pub palette: Palette,
    pub sprite_path: PathBuf,
    pub font_path: PathBuf,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}

impl Ruleset {
    /// Preset for a variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Scored => Self::scored(),
        }
    }

    /// Heavy gravity, strong flap, fast pipes, no score
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,
            title: "Flappy Bird Clone".to_string(),
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            gravity: 0.5,
            jump_impulse: -10.0,
            pipe_speed: 3.0,
            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_count: PIPE_COUNT,
            pipe_spacing: PIPE_SPACING,
            pipe_margin: PIPE_MARGIN,
            bird_start: Vec2::new(BIRD_X, WINDOW_HEIGHT / 2.0),
            bird_size: Vec2::new(34.0, 24.0),
            scoring: false,
            score_offset: SCORE_OFFSET,
            score_label: "Score".to_string(),
            score_pos: Vec2::new(20.0, 20.0),
            game_over_text: "Game Over! Press Space to Restart".to_string(),
            palette: Palette {
                sky: Rgb::new(0, 255, 255),
                pipe: Rgb::new(0, 255, 0),
                bird: Rgb::new(245, 200, 66),
                game_over: Rgb::new(255, 0, 0),
                score: Rgb::new(255, 255, 255),
            },
            sprite_path: PathBuf::from("assets/classic/bird.txt"),
            font_path: PathBuf::from("assets/classic/font.txt"),
        }
    }

    /// Light gravity, gentle flap, slow pipes, score counter
    pub fn scored() -> Self {
        Self {
            variant: Variant::Scored,
            gravity: 0.12,
            jump_impulse: -4.0,
            pipe_speed: 1.8,
            bird_size: Vec2::new(40.0, 30.0),
            scoring: true,
            game_over_text: "Press Space to Restart".to_string(),
            palette: Palette {
                sky: Rgb::new(0, 0, 0),
                pipe: Rgb::new(0, 255, 0),
                bird: Rgb::new(255, 140, 40),
                game_over: Rgb::new(255, 0, 0),
                score: Rgb::new(255, 255, 255),
            },
            sprite_path: PathBuf::from("assets/scored/bird.txt"),
            font_path: PathBuf::from("assets/scored/font.txt"),
            ..Self::classic()
        }
    }

    /// Parse a JSON ruleset layered over the preset named by its `variant` key
    pub fn from_json(json: &str) -> Result<Self, RulesetError> {
        let overrides: Value = serde_json::from_str(json).map_err(RulesetError::Parse)?;
        let variant = match overrides.get("variant") {
            Some(v) => serde_json::from_value(v.clone()).map_err(RulesetError::Parse)?,
            None => Variant::default(),
        };

        let mut merged =
            serde_json::to_value(Self::for_variant(variant)).map_err(RulesetError::Parse)?;
        merge_json(&mut merged, overrides);

        let ruleset: Self = serde_json::from_value(merged).map_err(RulesetError::Parse)?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Load and validate a JSON ruleset file
    pub fn load(path: &Path) -> Result<Self, RulesetError> {
        let json = std::fs::read_to_string(path).map_err(|source| RulesetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ruleset = Self::from_json(&json)?;
        log::info!("Loaded {} ruleset from {}", ruleset.variant.as_str(), path.display());
        Ok(ruleset)
    }

    /// Resolve a command-line argument: a preset name or a path to a JSON file
    pub fn resolve(arg: &str) -> Result<Self, RulesetError> {
        match Variant::from_str(arg) {
            Some(variant) => Ok(Self::for_variant(variant)),
            None => Self::load(Path::new(arg)),
        }
    }

    /// Reject rules the simulation cannot honor
    pub fn validate(&self) -> Result<(), RulesetError> {
        let floats = [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("pipe_speed", self.pipe_speed),
            ("pipe_width", self.pipe_width),
            ("pipe_gap", self.pipe_gap),
            ("pipe_spacing", self.pipe_spacing),
            ("pipe_margin", self.pipe_margin),
            ("score_offset", self.score_offset),
        ];
        if let Some((field, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RulesetError::invalid(*field, "must be a finite number"));
        }
        if !self.bird_start.is_finite() || !self.bird_size.is_finite() {
            return Err(RulesetError::invalid("bird", "must be finite"));
        }

        if self.window_width <= 0.0 || self.window_height <= 0.0 {
            return Err(RulesetError::invalid("window", "dimensions must be positive"));
        }
        if self.pipe_width <= 0.0 || self.pipe_gap <= 0.0 {
            return Err(RulesetError::invalid("pipe", "width and gap must be positive"));
        }
        if self.pipe_margin < 0.0 {
            return Err(RulesetError::invalid("pipe_margin", "must not be negative"));
        }
        if self.pipe_gap + 2.0 * self.pipe_margin > self.window_height {
            return Err(RulesetError::invalid(
                "pipe_gap",
                "gap plus both margins must fit in the window height",
            ));
        }
        if !self.pipe_layout().fits_whole_height() {
            return Err(RulesetError::invalid(
                "pipe_margin",
                "no whole-unit pipe height fits between the margins",
            ));
        }
        if self.pipe_count == 0 {
            return Err(RulesetError::invalid("pipe_count", "must be at least 1"));
        }
        if self.pipe_spacing <= 0.0 {
            return Err(RulesetError::invalid("pipe_spacing", "must be positive"));
        }
        if self.pipe_speed <= 0.0 || self.pipe_speed >= self.pipe_spacing {
            return Err(RulesetError::invalid(
                "pipe_speed",
                "must be positive and smaller than pipe_spacing",
            ));
        }
        if self.gravity < 0.0 {
            return Err(RulesetError::invalid("gravity", "must not be negative"));
        }
        if self.jump_impulse >= 0.0 {
            return Err(RulesetError::invalid("jump_impulse", "must be negative (upward)"));
        }
        if self.bird_size.x <= 0.0 || self.bird_size.y <= 0.0 {
            return Err(RulesetError::invalid("bird_size", "must be positive"));
        }
        if self.bird_start.y < 0.0 || self.bird_start.y + self.bird_size.y > self.window_height {
            return Err(RulesetError::invalid(
                "bird_start",
                "bird must start inside the window",
            ));
        }
        Ok(())
    }

    /// Pipe geometry derived from these rules
    pub fn pipe_layout(&self) -> PipeLayout {
        PipeLayout {
            window_width: self.window_width,
            window_height: self.window_height,
            width: self.pipe_width,
            gap: self.pipe_gap,
            margin: self.pipe_margin,
            spacing: self.pipe_spacing,
            speed: self.pipe_speed,
            count: self.pipe_count,
        }
    }
}

/// Recursively overlay `patch` onto `base` (objects merge, everything else replaces)
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge_json(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Errors from loading or validating a ruleset
#[derive(Debug)]
pub enum RulesetError {
    Io { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl RulesetError {
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}

impl fmt::Display for RulesetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read ruleset {}: {}", path.display(), source)
            }
            Self::Parse(err) => write!(f, "malformed ruleset: {}", err),
            Self::Invalid { field, reason } => write!(f, "invalid ruleset: {} {}", field, reason),
        }
    }
}

impl std::error::Error for RulesetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}
