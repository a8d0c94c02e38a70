use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode};
use crate::config;
use crate::metadata::MetadataSource;
use crate::ui::{self, Theme};

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: handles input and draws the UI.
/// Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    theme: &Theme,
    app: &mut App,
    metadata: &dyn MetadataSource,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app, theme, &settings.ui))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, metadata, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the app should quit.
pub fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    metadata: &dyn MetadataSource,
    state: &mut EventLoopState,
) -> bool {
    if app.input_mode == InputMode::OpenPrompt {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.cancel_open_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Enter => {
                let _ = app.submit_open_prompt(&settings.library, metadata);
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_prompt_char(c);
                }
            }
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return true;
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') | KeyCode::Right => {
            state.pending_gg = false;
            app.activate();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            state.pending_gg = false;
            app.collapse_or_parent();
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            app.toggle_sort_mode();
            app.set_status(format!("Sorted {}", app.sort_mode.label()));
        }
        KeyCode::Char('o') => {
            state.pending_gg = false;
            app.enter_open_prompt();
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}
