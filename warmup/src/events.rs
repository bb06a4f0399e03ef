//! Event handling for the warmup TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use warmup_core::KeyValueStore;

use crate::app::{App, InputMode};
use crate::command::Command;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event<S: KeyValueStore>(app: &mut App<S>, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) -> EventResult {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    let result = match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
    };

    if app.should_quit {
        EventResult::Quit
    } else {
        result
    }
}

/// Handle hotkeys in NORMAL mode
fn handle_normal_mode<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) -> EventResult {
    let command = match key.code {
        KeyCode::Char('n') | KeyCode::Right | KeyCode::Char(' ') => Command::Next,
        KeyCode::Char('b') | KeyCode::Left => Command::Back,
        KeyCode::Char('r') => Command::Reset,
        KeyCode::Char('f') => Command::Favorite,
        KeyCode::Char('p') => Command::Presentation,
        KeyCode::Char('t') => Command::Timer(None),
        KeyCode::Char('s') => Command::StopTimer,
        KeyCode::Char('c') => Command::ClearFilters,
        KeyCode::Char('?') | KeyCode::F(1) => Command::Help,
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Char('/') | KeyCode::Char(':') => {
            app.enter_command_mode();
            return EventResult::NeedsRedraw;
        }
        _ => return EventResult::Continue,
    };

    app.execute(command);
    EventResult::NeedsRedraw
}

/// Handle keys while typing a `/` command
fn handle_command_mode<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.enter_normal_mode();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.submit_command();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            if app.input_buffer().is_empty() {
                // Backspace on an empty prompt leaves command mode
                app.enter_normal_mode();
            } else {
                app.backspace();
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle key when overlay is open
fn handle_overlay_key<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warmup_core::{prompt, Catalog, FilterAxis, MemoryStore, TestHarness};

    fn app() -> App<MemoryStore> {
        let catalog = Catalog::new(vec![
            prompt("a").tags(["x"]).build(),
            prompt("b").tags(["y"]).build(),
        ])
        .unwrap();
        App::new(TestHarness::new(catalog).engine)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_line<S: KeyValueStore>(app: &mut App<S>, line: &str) {
        for c in line.chars() {
            handle_event(app, key(KeyCode::Char(c)));
        }
        handle_event(app, key(KeyCode::Enter));
    }

    #[test]
    fn test_next_and_back_keys() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('n')));
        let first = app.engine.current_id().map(String::from);
        handle_event(&mut app, key(KeyCode::Char('n')));
        assert_ne!(app.engine.current_id().map(String::from), first);

        handle_event(&mut app, key(KeyCode::Char('b')));
        assert_eq!(app.engine.current_id().map(String::from), first);
    }

    #[test]
    fn test_slash_opens_filter_prompt() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Command);

        type_line(&mut app, "tag y");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.engine.filters().is_selected(FilterAxis::Tag, "y"));
        assert_eq!(app.engine.current_id(), Some("b"));
    }

    #[test]
    fn test_escape_cancels_command() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('/')));
        handle_event(&mut app, key(KeyCode::Char('t')));
        handle_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.input_buffer().is_empty());
        assert!(!app.timer.is_running());
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        assert_eq!(handle_event(&mut app, key(KeyCode::Char('q'))), EventResult::Quit);
    }

    #[test]
    fn test_quit_command() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('/')));
        for c in "quit".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(handle_event(&mut app, key(KeyCode::Enter)), EventResult::Quit);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.has_overlay());

        handle_event(&mut app, key(KeyCode::Char('n')));
        assert!(app.engine.current_prompt().is_none());

        handle_event(&mut app, key(KeyCode::Esc));
        assert!(!app.has_overlay());
    }
}
