//! Status and hotkey bars

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use warmup_core::DeckState;

use crate::app::InputMode;
use crate::ui::theme::WarmupTheme;

/// Deck progress plus the latest status message, or the command prompt
/// while one is being typed
pub struct StatusBarWidget<'a> {
    theme: &'a WarmupTheme,
    state: DeckState,
    remaining: usize,
    match_count: usize,
    input_mode: InputMode,
    input: &'a str,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(state: DeckState, remaining: usize, match_count: usize, theme: &'a WarmupTheme) -> Self {
        Self {
            theme,
            state,
            remaining,
            match_count,
            input_mode: InputMode::Normal,
            input: "",
            message: None,
        }
    }

    pub fn input(mut self, mode: InputMode, input: &'a str) -> Self {
        self.input_mode = mode;
        self.input = input;
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let command_mode = self.input_mode == InputMode::Command;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(command_mode));

        let line = if command_mode {
            Line::from(vec![
                Span::styled("/", Style::default().fg(self.theme.border_focused)),
                Span::raw(self.input.to_string()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        } else {
            let deck = match self.state {
                DeckState::Empty => "Deck empty".to_string(),
                DeckState::Active => format!("{}/{} left", self.remaining, self.match_count),
                DeckState::Exhausted => "Deck exhausted, next reshuffles".to_string(),
            };
            let mut spans = vec![Span::styled(
                deck,
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(message) = self.message {
                spans.push(Span::raw(" | "));
                spans.push(Span::styled(message.to_string(), self.theme.status_style()));
            }
            Line::from(spans)
        };

        Paragraph::new(line).block(block).render(area, buf);
    }
}

/// One-line key reference
pub struct HotkeyBarWidget<'a> {
    theme: &'a WarmupTheme,
    can_go_back: bool,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(can_go_back: bool, theme: &'a WarmupTheme) -> Self {
        Self { theme, can_go_back }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let keys: &[(&str, &str, bool)] = &[
            ("n", "next", true),
            ("b", "back", self.can_go_back),
            ("r", "reset", true),
            ("f", "fav", true),
            ("t", "timer", true),
            ("s", "stop", true),
            ("/", "filter", true),
            ("c", "clear", true),
            ("p", "present", true),
            ("?", "help", true),
            ("q", "quit", true),
        ];

        let mut spans = Vec::new();
        for (key, label, enabled) in keys {
            let style = if *enabled {
                Style::default().fg(self.theme.border_focused)
            } else {
                Style::default().fg(self.theme.border)
            };
            spans.push(Span::styled(format!(" {key}"), style.add_modifier(Modifier::BOLD)));
            spans.push(Span::styled(format!(" {label} "), self.theme.status_style()));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
