//! Flappy Clone entry point
//!
//! Usage: `flappy-clone [classic|scored|RULES.json] [SEED]`
//!
//! Loads the ruleset and its assets, then runs the game loop in the terminal.

use std::fs::File;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use flappy_clone::consts::TICK_DURATION;
use flappy_clone::platform::{FrameClock, InputEvent, poll_until};
use flappy_clone::renderer::{FrameBuffer, Scene, TerminalRenderer};
use flappy_clone::sim::{GameEvent, GameState, TickInput, tick};
use flappy_clone::{Assets, Ruleset};

/// stderr shares the screen with the game, so logs go to a file
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    let path = std::env::temp_dir().join("flappy-clone.log");
    if let Ok(file) = File::create(&path) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn main() -> ExitCode {
    init_logging();
    log::info!("Flappy Clone starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let ruleset = match args.next() {
        Some(arg) => Ruleset::resolve(&arg).with_context(|| format!("loading rules `{}`", arg))?,
        None => Ruleset::default(),
    };
    let seed = match args.next() {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("seed `{}` is not a number", arg))?,
        None => time_seed(),
    };

    let assets = Assets::for_ruleset(&ruleset).context("loading assets")?;
    log::info!("Playing {} rules with seed {}", ruleset.variant.as_str(), seed);

    let mut term = TerminalRenderer::new();
    term.enter(&ruleset.title).context("initializing terminal")?;

    let result = game_loop(&mut term, GameState::new(ruleset, seed), &assets);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn game_loop(term: &mut TerminalRenderer, mut state: GameState, assets: &Assets) -> Result<()> {
    let mut clock = FrameClock::new(TICK_DURATION);
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        let mut input = TickInput::default();
        for event in poll_until(clock.deadline())? {
            match event {
                InputEvent::Flap => input.flap = true,
                InputEvent::Resize => term.invalidate(),
                InputEvent::Quit => {
                    log::info!("Quit requested");
                    return Ok(());
                }
            }
        }

        for event in tick(&mut state, &input) {
            if let GameEvent::Scored { score } = event {
                log::info!("Score {}", score);
            }
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        fb.resize(w, h);
        Scene::compose(&state).paint(assets, &mut fb);
        term.present(&mut fb)?;

        clock.advance();
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
