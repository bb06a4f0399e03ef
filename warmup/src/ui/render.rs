//! Render orchestration for the warmup TUI

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use warmup_core::KeyValueStore;

use crate::app::App;
use crate::command::COMMAND_HELP;
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{
    FilterPanelWidget, HotkeyBarWidget, PromptCardWidget, StatusBarWidget, TimerGaugeWidget,
};

/// Overlay types
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
}

/// Main render function
pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    let engine = &app.engine;
    let presentation = engine.preferences().presentation;
    let layout = AppLayout::calculate(area, presentation);

    render_title_bar(frame, app, layout.title_area);

    let current = engine.current_prompt();
    let favorite = current.is_some_and(|p| engine.is_favorite(&p.id));
    let card = PromptCardWidget::new(current, &app.theme)
        .favorite(favorite)
        .presentation(presentation);
    frame.render_widget(card, layout.prompt_area);

    if !presentation {
        let filters = FilterPanelWidget::new(engine.catalog(), engine.filters(), &app.theme)
            .match_count(engine.match_count());
        frame.render_widget(filters, layout.sidebar_area);
    }

    frame.render_widget(TimerGaugeWidget::new(&app.timer, &app.theme), layout.timer_area);

    let status = StatusBarWidget::new(
        engine.state(),
        engine.remaining(),
        engine.match_count(),
        &app.theme,
    )
    .input(app.input_mode, app.input_buffer())
    .message(app.status_message());
    frame.render_widget(status, layout.status_bar);

    frame.render_widget(
        HotkeyBarWidget::new(engine.can_go_back(), &app.theme),
        layout.hotkey_bar,
    );

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the title bar
fn render_title_bar<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let engine = &app.engine;
    let title = format!(
        " Design Warmup | {} shown | {} favorites ",
        engine.history().len(),
        engine.favorites().len()
    );

    let line = Line::from(Span::styled(
        title,
        Style::default()
            .fg(app.theme.foreground)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render overlay
fn render_overlay<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
    }
}

/// Render help overlay
fn render_help_overlay<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let popup_area = centered_rect_fixed(56, 30, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let mut help_text = vec![
        Line::from(Span::styled(
            " Design Warmup - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Keys:", heading)),
        Line::from("  n / Space / →   Next prompt"),
        Line::from("  b / ←           Previous prompt"),
        Line::from("  r               Reshuffle the deck"),
        Line::from("  f               Star the current prompt"),
        Line::from("  t / s           Start / stop the timer"),
        Line::from("  c               Clear filters"),
        Line::from("  p               Presentation mode"),
        Line::from("  /               Type a command"),
        Line::from("  q               Quit"),
        Line::from(""),
        Line::from(Span::styled("Commands:", heading)),
    ];
    help_text.extend(
        COMMAND_HELP
            .iter()
            .map(|(usage, description)| Line::from(format!("  {usage:<15} {description}"))),
    );
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        "Press Esc or ? to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}
