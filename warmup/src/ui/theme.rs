//! Color theme and styling for the warmup TUI

use ratatui::style::{Color, Modifier, Style};

/// UI color theme
#[derive(Debug, Clone)]
pub struct WarmupTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Prompt card
    pub title_text: Color,
    pub body_text: Color,
    pub meta_text: Color,
    pub tag_text: Color,
    pub favorite: Color,

    // Filters
    pub filter_on: Color,
    pub filter_off: Color,

    // Timer
    pub timer_running: Color,
    pub timer_finished: Color,

    pub status_text: Color,
}

impl Default for WarmupTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            title_text: Color::LightCyan,
            body_text: Color::White,
            meta_text: Color::Gray,
            tag_text: Color::LightMagenta,
            favorite: Color::Yellow,

            filter_on: Color::LightGreen,
            filter_off: Color::DarkGray,

            timer_running: Color::Cyan,
            timer_finished: Color::LightRed,

            status_text: Color::DarkGray,
        }
    }
}

impl WarmupTheme {
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title_text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn body_style(&self) -> Style {
        Style::default().fg(self.body_text)
    }

    pub fn meta_style(&self) -> Style {
        Style::default().fg(self.meta_text)
    }

    pub fn tag_style(&self) -> Style {
        Style::default().fg(self.tag_text)
    }

    pub fn favorite_style(&self, starred: bool) -> Style {
        if starred {
            Style::default()
                .fg(self.favorite)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Style for a filter value, by whether it is selected
    pub fn filter_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.filter_on)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.filter_off)
        }
    }

    pub fn timer_color(&self, finished: bool) -> Color {
        if finished {
            self.timer_finished
        } else {
            self.timer_running
        }
    }

    /// Get style for status messages
    pub fn status_style(&self) -> Style {
        Style::default()
            .fg(self.status_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}
