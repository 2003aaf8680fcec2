//! Terminal rendering module
//!
//! Game state is described as a `Scene` in world units, rasterized onto a
//! character `FrameBuffer`, and presented with diffed terminal writes.

pub mod fb;
pub mod scene;
pub mod terminal;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use scene::{DrawCmd, Scene, TextAnchor};
pub use terminal::TerminalRenderer;
