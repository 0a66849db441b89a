//! Full-screen renderer for a running playback.

mod panels;
mod scene;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use holo_playback::PlaybackHandle;

pub use scene::Scene;

const FRAME: Duration = Duration::from_millis(16);

/// Render `handle` until the user quits or the playback task ends.
pub fn run(handle: &PlaybackHandle, scene: &Scene) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut terminal = match enter() {
        Ok(terminal) => terminal,
        Err(e) => {
            restore();
            return Err(e);
        }
    };

    let result = run_loop(&mut terminal, handle, scene);

    restore();
    terminal.show_cursor().ok();

    result
}

/// Switch to the alternate screen and build the terminal. Raw mode must
/// already be on.
fn enter() -> Result<Terminal<CrosstermBackend<io::Stdout>>, String> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| format!("terminal error: {e}"))
}

/// Leave raw mode and the alternate screen. Safe to call after a partial setup.
fn restore() {
    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &PlaybackHandle,
    scene: &Scene,
) -> Result<(), String> {
    loop {
        let state = handle.snapshot();
        terminal
            .draw(|frame| panels::draw(frame, &state, scene))
            .map_err(|e| format!("draw error: {e}"))?;

        if handle.is_finished() {
            return Ok(());
        }

        if event::poll(FRAME).map_err(|e| format!("event error: {e}"))? {
            let event = event::read().map_err(|e| format!("event error: {e}"))?;
            if is_quit(&event) {
                return Ok(());
            }
        }
    }
}

fn is_quit(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn quit_keys() {
        let q = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(is_quit(&q));
        assert!(is_quit(&esc));
        assert!(is_quit(&ctrl_c));
        assert!(!is_quit(&c));
        assert!(!is_quit(&Event::FocusGained));
    }

    #[test]
    fn restore_tolerates_partial_setup() {
        // Neither raw mode nor the alternate screen is active here.
        restore();
        restore();
    }
}
