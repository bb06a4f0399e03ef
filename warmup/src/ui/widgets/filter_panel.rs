//! Sidebar listing every filter value the catalog offers

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use warmup_core::{Catalog, FilterAxis, FilterSet};

use crate::ui::theme::WarmupTheme;

pub struct FilterPanelWidget<'a> {
    catalog: &'a Catalog,
    filters: &'a FilterSet,
    theme: &'a WarmupTheme,
    match_count: usize,
}

impl<'a> FilterPanelWidget<'a> {
    pub fn new(catalog: &'a Catalog, filters: &'a FilterSet, theme: &'a WarmupTheme) -> Self {
        Self {
            catalog,
            filters,
            theme,
            match_count: 0,
        }
    }

    pub fn match_count(mut self, count: usize) -> Self {
        self.match_count = count;
        self
    }

    fn axis_lines(&self, axis: FilterAxis, values: Vec<String>) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            format!("{axis}:"),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ))];

        let mut spans = Vec::new();
        for value in values {
            let selected = self.filters.is_selected(axis, &value);
            let marker = if selected { "●" } else { "○" };
            spans.push(Span::styled(
                format!("{marker} {value}  "),
                self.theme.filter_style(selected),
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
        lines
    }
}

impl Widget for FilterPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Filters ({} matching) ", self.match_count))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let times: Vec<String> = self
            .catalog
            .time_buckets()
            .into_iter()
            .map(|t| t.to_string())
            .collect();
        let tags: Vec<String> = self.catalog.tags().into_iter().map(String::from).collect();
        let modes: Vec<String> = self.catalog.modes().into_iter().map(String::from).collect();

        let mut lines = Vec::new();
        lines.extend(self.axis_lines(FilterAxis::Time, times));
        lines.extend(self.axis_lines(FilterAxis::Tag, tags));
        lines.extend(self.axis_lines(FilterAxis::Mode, modes));
        lines.push(Line::from(Span::styled(
            format!("Active: {}", self.filters.summary()),
            self.theme.status_style(),
        )));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
