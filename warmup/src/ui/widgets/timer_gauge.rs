//! Countdown progress bar

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge, Widget},
};

use warmup_core::{Countdown, TimerState};

use crate::ui::theme::WarmupTheme;

pub struct TimerGaugeWidget<'a> {
    timer: &'a Countdown,
    theme: &'a WarmupTheme,
}

impl<'a> TimerGaugeWidget<'a> {
    pub fn new(timer: &'a Countdown, theme: &'a WarmupTheme) -> Self {
        Self { timer, theme }
    }
}

impl Widget for TimerGaugeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let finished = self.timer.state() == TimerState::Finished;
        let block = Block::default()
            .title(" Timer ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.timer.is_running()));

        Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(self.theme.timer_color(finished)))
            .ratio(self.timer.progress().clamp(0.0, 1.0))
            .label(self.timer.label())
            .render(area, buf);
    }
}
