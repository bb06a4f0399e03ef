//! Screen layout calculation

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Regions of the main screen
pub struct AppLayout {
    pub title_area: Rect,
    pub prompt_area: Rect,
    pub sidebar_area: Rect,
    pub timer_area: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
}

impl AppLayout {
    /// Prompt card on the left, filters on the right. In presentation mode
    /// the sidebar collapses and the card takes the full width.
    pub fn calculate(area: Rect, presentation: bool) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        let (prompt_area, sidebar_area) = if presentation {
            (rows[1], Rect::default())
        } else {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
                .split(rows[1]);
            (columns[0], columns[1])
        };

        Self {
            title_area: rows[0],
            prompt_area,
            sidebar_area,
            timer_area: rows[2],
            status_bar: rows[3],
            hotkey_bar: rows[4],
        }
    }
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
