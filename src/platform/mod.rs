//! Platform abstraction layer
//!
//! Handles the terminal-facing side of the game loop:
//! - Frame pacing (60 Hz, one simulation step per frame)
//! - Input events (key presses, quit, resize)

pub mod input;
pub mod time;

pub use input::{InputEvent, map_event, map_key, poll_until};
pub use time::FrameClock;
