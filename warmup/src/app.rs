//! Main application state and logic

use std::time::Duration;

use warmup_core::{
    Advance, Countdown, DeckEngine, DeckState, FileStore, KeyValueStore, PromptEntry,
};

use crate::command::Command;
use crate::ui::theme::WarmupTheme;
use crate::ui::Overlay;

/// Input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Hotkeys (default)
    #[default]
    Normal,
    /// Typing a `/` command
    Command,
}

/// Main application state
pub struct App<S = FileStore> {
    pub engine: DeckEngine<S>,
    pub timer: Countdown,

    // UI state
    pub theme: WarmupTheme,
    pub input_mode: InputMode,
    input_buffer: String,
    overlay: Option<Overlay>,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(engine: DeckEngine<S>) -> Self {
        Self {
            engine,
            timer: Countdown::new(),
            theme: WarmupTheme::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            overlay: None,
            status_message: None,
            should_quit: false,
        }
    }

    /// Show a first prompt if nothing was on screen when the session was saved.
    pub fn ensure_prompt(&mut self) {
        if self.engine.current_prompt().is_none() {
            self.execute(Command::Next);
        }
    }

    pub fn current_prompt(&self) -> Option<&PromptEntry> {
        self.engine.current_prompt()
    }

    /// Run a parsed command, reporting the outcome in the status line.
    pub fn execute(&mut self, command: Command) {
        let message = match command {
            Command::Next => match self.engine.advance() {
                Ok(Advance::Shown { reshuffled: true, .. }) => {
                    "Deck reshuffled".to_string()
                }
                Ok(Advance::Shown { .. }) => format!("{} left in deck", self.engine.remaining()),
                Ok(Advance::NoMatches) => "No prompts match the current filters".to_string(),
                Err(e) => format!("Error: {e}"),
            },
            Command::Back => match self.engine.back() {
                Ok(true) => "Back".to_string(),
                Ok(false) => "Nothing to go back to".to_string(),
                Err(e) => format!("Error: {e}"),
            },
            Command::Reset => match self.engine.reset_deck() {
                Ok(DeckState::Empty) => "No prompts match the current filters".to_string(),
                Ok(_) => {
                    self.execute(Command::Next);
                    return;
                }
                Err(e) => format!("Error: {e}"),
            },
            Command::Favorite => match self.engine.toggle_current_favorite() {
                Ok(Some(true)) => "Added to favorites".to_string(),
                Ok(Some(false)) => "Removed from favorites".to_string(),
                Ok(None) => "No prompt to favorite".to_string(),
                Err(e) => format!("Error: {e}"),
            },
            Command::Presentation => match self.engine.toggle_presentation() {
                Ok(true) => "Presentation mode on".to_string(),
                Ok(false) => "Presentation mode off".to_string(),
                Err(e) => format!("Error: {e}"),
            },
            Command::Timer(minutes) => {
                let minutes = minutes.or_else(|| self.current_prompt().map(|p| p.time.max()));
                match minutes {
                    Some(minutes) => {
                        self.timer.start(minutes);
                        format!("Timer: {minutes} min")
                    }
                    None => "No prompt to time".to_string(),
                }
            }
            Command::StopTimer => {
                self.timer.stop();
                self.timer.label()
            }
            Command::ClearFilters => match self.engine.clear_filters() {
                Ok(()) => {
                    self.execute(Command::Next);
                    return;
                }
                Err(e) => format!("Error: {e}"),
            },
            Command::Filter(axis, value) => match self.engine.toggle_filter(axis, &value) {
                Ok(selected) => {
                    let verb = if selected { "+" } else { "-" };
                    match self.engine.advance() {
                        Ok(Advance::NoMatches) => {
                            format!("{verb}{axis} {value}: no prompts match")
                        }
                        Ok(_) => format!(
                            "{verb}{axis} {value}: {} matching",
                            self.engine.match_count()
                        ),
                        Err(e) => format!("Error: {e}"),
                    }
                }
                Err(e) => format!("Error: {e}"),
            },
            Command::Status => format!(
                "{} | {} matching | {} left",
                self.engine.filters().summary(),
                self.engine.match_count(),
                self.engine.remaining()
            ),
            Command::Help => {
                self.toggle_help();
                return;
            }
            Command::Quit => {
                self.should_quit = true;
                return;
            }
        };
        self.set_status(message);
    }

    /// Parse and run a command line, reporting parse errors in the status line.
    pub fn run_command_line(&mut self, line: &str) {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Advance timers by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if self.timer.tick(dt) {
            self.set_status("Time's up");
        }
    }

    // =========================================================================
    // Command input
    // =========================================================================

    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer.clear();
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn type_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    /// Run the typed command and return to normal mode.
    pub fn submit_command(&mut self) {
        let line = std::mem::take(&mut self.input_buffer);
        self.input_mode = InputMode::Normal;
        if !line.trim().is_empty() {
            self.run_command_line(&line);
        }
    }

    // =========================================================================
    // Overlays and status
    // =========================================================================

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Some(Overlay::Help) => None,
            None => Some(Overlay::Help),
        };
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warmup_core::{prompt, Catalog, FilterAxis, MemoryStore, TestHarness, TimerState};

    fn app() -> App<MemoryStore> {
        let catalog = Catalog::new(vec![
            prompt("a").tags(["x"]).time(5).build(),
            prompt("b").tags(["y"]).range(10, 15).build(),
            prompt("c").tags(["x"]).mode("pair").time(10).build(),
        ])
        .unwrap();
        App::new(TestHarness::new(catalog).engine)
    }

    #[test]
    fn test_ensure_prompt_shows_first_prompt() {
        let mut app = app();
        assert!(app.current_prompt().is_none());
        app.ensure_prompt();
        assert!(app.current_prompt().is_some());
        assert_eq!(app.status_message(), Some("Deck reshuffled"));
    }

    #[test]
    fn test_filter_command_advances_into_new_deck() {
        let mut app = app();
        app.ensure_prompt();
        app.run_command_line("tag x");

        assert!(app.engine.filters().is_selected(FilterAxis::Tag, "x"));
        assert!(app.current_prompt().unwrap().has_tag("x"));
        assert_eq!(app.status_message(), Some("+tag x: 2 matching"));
    }

    #[test]
    fn test_filter_without_matches_reports_it() {
        let mut app = app();
        app.run_command_line("tag nope");
        assert!(app.current_prompt().is_none());
        assert_eq!(app.status_message(), Some("+tag nope: no prompts match"));
    }

    #[test]
    fn test_timer_uses_prompt_upper_bound() {
        let mut app = app();
        app.run_command_line("tag y");
        app.execute(Command::Timer(None));
        assert_eq!(app.timer.total(), Duration::from_secs(15 * 60));

        app.tick(Duration::from_secs(15 * 60));
        assert_eq!(app.timer.state(), TimerState::Finished);
        assert_eq!(app.status_message(), Some("Time's up"));

        app.execute(Command::StopTimer);
        app.execute(Command::StopTimer);
        assert_eq!(app.status_message(), Some("Timer: off"));
    }

    #[test]
    fn test_timer_without_prompt() {
        let mut app = app();
        app.execute(Command::Timer(None));
        assert_eq!(app.timer.state(), TimerState::Idle);
        app.execute(Command::Timer(Some(3)));
        assert!(app.timer.is_running());
    }

    #[test]
    fn test_command_mode_round_trip() {
        let mut app = app();
        app.enter_command_mode();
        for c in "quit".chars() {
            app.type_char(c);
        }
        app.submit_command();
        assert!(app.should_quit);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_bad_command_sets_status() {
        let mut app = app();
        app.run_command_line("dance");
        assert_eq!(app.status_message(), Some("Unknown command: dance"));
    }

    #[test]
    fn test_help_toggles_overlay() {
        let mut app = app();
        app.execute(Command::Help);
        assert!(app.has_overlay());
        app.execute(Command::Help);
        assert!(!app.has_overlay());
    }
}
