//! Per-frame simulation step
//!
//! Order within a running tick: flap → gravity → move bird → scroll pipes →
//! recycle → bounds and pipe collision → scoring.

use rand::Rng;

use super::collision::vertical_exit;
use super::state::{CrashCause, GameState, RunPhase};

/// Input edges collected since the previous tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Flap key pressed (restarts the run when terminated)
    pub flap: bool,
}

/// Things that happened during a tick, for logging and presentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Flapped,
    Restarted,
    /// A pipe was recycled and respawned at this x
    Recycled { x: f32 },
    /// Score increased to this value
    Scored { score: u32 },
    Crashed(CrashCause),
}

/// Advance the game state by one tick
pub fn tick<R: Rng>(state: &mut GameState<R>, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.flap {
        match state.phase {
            RunPhase::Terminated => {
                state.reset();
                log::info!("Run restarted");
                events.push(GameEvent::Restarted);
                return events;
            }
            RunPhase::Running => {
                state.bird.jump(state.ruleset.jump_impulse);
                events.push(GameEvent::Flapped);
            }
        }
    }

    // Terminated runs only wait for input
    if state.phase == RunPhase::Terminated {
        return events;
    }

    state.time_ticks += 1;

    state.bird.apply_gravity(state.ruleset.gravity);
    state.bird.advance();

    state.pipes.advance();
    if let Some(x) = state.pipes.recycle(&mut state.rng) {
        log::debug!("Recycled pipe to x={:.1}", x);
        events.push(GameEvent::Recycled { x });
    }

    if let Some(cause) = detect_crash(state) {
        state.phase = RunPhase::Terminated;
        log::info!(
            "Run ended after {} ticks: {:?} (score {})",
            state.time_ticks,
            cause,
            state.score
        );
        events.push(GameEvent::Crashed(cause));
        return events;
    }

    if state.ruleset.scoring {
        let line = state.bird.pos.x - state.ruleset.score_offset;
        let awarded = state.pipes.award(line);
        if awarded > 0 {
            state.score += awarded;
            events.push(GameEvent::Scored { score: state.score });
        }
    }

    events
}

/// Bounds are checked before pipes; the first overlapping pipe wins
fn detect_crash<R>(state: &GameState<R>) -> Option<CrashCause> {
    let bounds = state.bird.bounds();
    if let Some(edge) = vertical_exit(&bounds, state.ruleset.window_height) {
        return Some(CrashCause::OutOfBounds(edge));
    }
    state
        .pipes
        .first_collision(&bounds)
        .map(|index| CrashCause::Pipe { index })
}
