//! The card showing the current prompt

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use warmup_core::PromptEntry;

use crate::ui::theme::WarmupTheme;

/// Current prompt, or a placeholder when nothing matches
pub struct PromptCardWidget<'a> {
    prompt: Option<&'a PromptEntry>,
    theme: &'a WarmupTheme,
    favorite: bool,
    presentation: bool,
}

impl<'a> PromptCardWidget<'a> {
    pub fn new(prompt: Option<&'a PromptEntry>, theme: &'a WarmupTheme) -> Self {
        Self {
            prompt,
            theme,
            favorite: false,
            presentation: false,
        }
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn presentation(mut self, presentation: bool) -> Self {
        self.presentation = presentation;
        self
    }

    fn prompt_lines(&self, prompt: &PromptEntry) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        let star = if self.favorite { "★ " } else { "☆ " };
        lines.push(Line::from(vec![
            Span::styled(star, self.theme.favorite_style(self.favorite)),
            Span::styled(prompt.title.clone(), self.theme.title_style()),
        ]));

        // Meta pills: time, difficulty, mode, id
        let mut meta = vec![Span::styled(prompt.time.to_string(), self.theme.meta_style())];
        if let Some(level) = prompt.difficulty {
            meta.push(Span::raw("  ·  "));
            meta.push(Span::styled(format!("Level {level}"), self.theme.meta_style()));
        }
        if let Some(mode) = &prompt.mode {
            meta.push(Span::raw("  ·  "));
            meta.push(Span::styled(mode.clone(), self.theme.meta_style()));
        }
        meta.push(Span::raw("  ·  "));
        meta.push(Span::styled(
            prompt.id.clone(),
            self.theme.meta_style().add_modifier(Modifier::DIM),
        ));
        lines.push(Line::from(meta));
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled(
            prompt.body.clone(),
            self.theme.body_style(),
        )));

        if let Some(goal) = &prompt.goal {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Goal: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(goal.clone(), self.theme.body_style()),
            ]));
        }

        if !prompt.how_to.is_empty() && !self.presentation {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "How to:",
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            for step in &prompt.how_to {
                lines.push(Line::from(format!("  • {step}")));
            }
        }

        if !prompt.tags.is_empty() {
            lines.push(Line::from(""));
            let tags: Vec<Span> = prompt
                .tags
                .iter()
                .map(|tag| Span::styled(format!("#{tag} "), self.theme.tag_style()))
                .collect();
            lines.push(Line::from(tags));
        }

        lines
    }
}

impl Widget for PromptCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Prompt ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let lines = match self.prompt {
            Some(prompt) => self.prompt_lines(prompt),
            None => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No prompts match the current filters.",
                    self.theme.title_style(),
                )),
                Line::from(Span::styled(
                    "Press c to clear filters or / to change them.",
                    self.theme.status_style(),
                )),
            ],
        };

        let alignment = if self.presentation {
            Alignment::Center
        } else {
            Alignment::Left
        };

        Paragraph::new(lines)
            .block(block)
            .alignment(alignment)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
