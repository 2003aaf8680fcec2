//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per tick, no wall-clock time
//! - Injected RNG only
//! - Stable iteration order (pipes front to back)
//! - No rendering or platform dependencies

pub mod collision;
pub mod pipes;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Edge, vertical_exit};
pub use pipes::{Pipe, PipeLayout, PipeStream};
pub use state::{Bird, CrashCause, GameState, RunPhase};
pub use tick::{GameEvent, TickInput, tick};
