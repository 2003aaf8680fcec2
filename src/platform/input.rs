//! Key mapping from terminal events to game input

use std::io;
use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Input the game loop cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Flap while running, restart when the run is over
    Flap,
    /// Close the game
    Quit,
    /// Terminal size changed; the next frame must be a full redraw
    Resize,
}

/// Map a key press to game input
///
/// Repeats and releases are ignored. Terminals only tell them apart from
/// presses when key event types are reported (see `TerminalRenderer::enter`);
/// elsewhere auto-repeat arrives as more presses.
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Quit)
        }
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::Quit),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(InputEvent::Flap)
        }
        _ => None,
    }
}

pub fn map_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Resize(_, _) => Some(InputEvent::Resize),
        _ => None,
    }
}

/// Collect input until `deadline`, returning early on quit
pub fn poll_until(deadline: Instant) -> io::Result<Vec<InputEvent>> {
    let mut events = Vec::new();
    loop {
        let timeout = deadline.saturating_duration_since(Instant::now());
        if !event::poll(timeout)? {
            return Ok(events);
        }
        if let Some(input) = map_event(event::read()?) {
            events.push(input);
            if input == InputEvent::Quit {
                return Ok(events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_flap_keys() {
        for code in [KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w')] {
            assert_eq!(map_key(key(code, KeyEventKind::Press)), Some(InputEvent::Flap));
        }
    }

    #[test]
    fn test_repeat_and_release_are_ignored() {
        assert_eq!(map_key(key(KeyCode::Char(' '), KeyEventKind::Repeat)), None);
        assert_eq!(map_key(key(KeyCode::Char(' '), KeyEventKind::Release)), None);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(
            map_key(key(KeyCode::Esc, KeyEventKind::Press)),
            Some(InputEvent::Quit)
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Quit)
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_resize_event() {
        assert_eq!(map_event(Event::Resize(80, 24)), Some(InputEvent::Resize));
        assert_eq!(map_event(Event::FocusGained), None);
    }
}
