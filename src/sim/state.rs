//! Game state and core simulation types
//!
//! Everything a run mutates lives in `GameState`, which is passed to `tick`
//! explicitly. The random source is a type parameter so tests and replays can
//! supply their own; the default is a seeded PCG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Aabb, Edge};
use super::pipes::PipeStream;
use crate::ruleset::Ruleset;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Physics and pipes advance every tick
    Running,
    /// Run ended; waiting for restart input
    Terminated,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    /// Bird left the window vertically
    OutOfBounds(Edge),
    /// Bird hit the pipe at this stream index
    Pipe { index: usize },
}

/// The player's bird
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Top-left corner of the hitbox
    pub pos: Vec2,
    /// Vertical speed in world units per tick (positive = down)
    pub velocity: f32,
    pub size: Vec2,
}

impl Bird {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            velocity: 0.0,
            size,
        }
    }

    /// Accelerate downward (no terminal velocity)
    #[inline]
    pub fn apply_gravity(&mut self, gravity: f32) {
        self.velocity += gravity;
    }

    /// Replace the current velocity with the flap impulse
    #[inline]
    pub fn jump(&mut self, impulse: f32) {
        self.velocity = impulse;
    }

    /// Move by one tick of velocity
    #[inline]
    pub fn advance(&mut self) {
        self.pos.y += self.velocity;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    pub ruleset: Ruleset,
    pub phase: RunPhase,
    pub bird: Bird,
    pub pipes: PipeStream,
    /// Pipes passed this run (stays 0 when the ruleset has no scoring)
    pub score: u32,
    /// Ticks simulated since the run started
    pub time_ticks: u64,
    pub(super) rng: R,
}

impl GameState<Pcg32> {
    /// Create a new session with a seeded RNG
    pub fn new(ruleset: Ruleset, seed: u64) -> Self {
        Self::with_rng(ruleset, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Create a new session drawing pipe gaps from `rng`
    pub fn with_rng(ruleset: Ruleset, mut rng: R) -> Self {
        let pipes = PipeStream::new(ruleset.pipe_layout(), &mut rng);
        let bird = Bird::new(ruleset.bird_start, ruleset.bird_size);
        Self {
            ruleset,
            phase: RunPhase::Running,
            bird,
            pipes,
            score: 0,
            time_ticks: 0,
            rng,
        }
    }

    /// Put the bird, pipes and score back to the start of a run
    pub fn reset(&mut self) {
        self.bird = Bird::new(self.ruleset.bird_start, self.ruleset.bird_size);
        self.pipes.reset(&mut self.rng);
        self.score = 0;
        self.time_ticks = 0;
        self.phase = RunPhase::Running;
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }
}
