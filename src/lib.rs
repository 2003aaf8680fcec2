//! Flappy Clone - a terminal arcade game about threading a bird through pipes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipe stream, collisions, scoring)
//! - `ruleset`: Variant presets and data-driven game constants
//! - `assets`: Sprite and banner font loading
//! - `renderer`: Scene composition and terminal rasterization
//! - `platform`: Frame clock and terminal input pump

pub mod assets;
pub mod platform;
pub mod renderer;
pub mod ruleset;
pub mod sim;

pub use assets::{AssetError, Assets};
pub use ruleset::{Ruleset, RulesetError, Variant};

/// Game configuration constants
///
/// These are the defaults the ruleset presets are built from. World units are
/// pixels of an 800x600 window: x grows right, y grows down.
pub mod consts {
    use std::time::Duration;

    /// Simulation and render rate (one physics step per frame)
    pub const TICK_RATE: u32 = 60;
    /// Wall-clock duration of one tick
    pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

    /// Logical window dimensions
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 70.0;
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_COUNT: usize = 3;
    pub const PIPE_SPACING: f32 = 300.0;
    /// Keeps the gap away from the top and bottom edges
    pub const PIPE_MARGIN: f32 = 50.0;

    /// Bird's fixed horizontal position (left edge)
    pub const BIRD_X: f32 = 100.0;
    /// A pipe counts once its trailing edge is this far behind the bird
    pub const SCORE_OFFSET: f32 = 10.0;
}
