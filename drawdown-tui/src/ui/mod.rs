//! Top-level UI layout: one scrolling dashboard with a status bar.

pub mod cards;
pub mod chart_panel;
pub mod header;
pub mod help_panel;
pub mod overlays;
pub mod status_bar;
pub mod summary;
pub mod table;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use ratatui::Frame;

use crate::app::{AppState, Overlay, ViewMode};
use crate::theme;

/// Height of the comparison chart when shown.
const CHART_HEIGHT: u16 = 14;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let failed = app.failed_tickers();
    let warning_height = u16::from(!failed.is_empty());
    let chart_height = if app.show_chart { CHART_HEIGHT } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(warning_height),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(chart_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render(f, chunks[0], app);
    if !failed.is_empty() {
        render_failed(f, chunks[1], &failed);
    }
    render_tabs(f, chunks[2], app);
    summary::render(f, chunks[3], app);
    if app.show_chart {
        chart_panel::render(f, chunks[4], app);
    }
    match app.view_mode {
        ViewMode::Cards => cards::render(f, chunks[5], app),
        ViewMode::Table => table::render(f, chunks[5], app),
    }
    status_bar::render(f, chunks[6], app);

    let main_area = f.area();
    match app.overlay {
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::AddTickers => overlays::render_add(f, main_area, &app.input),
        Overlay::RemoveTicker => overlays::render_remove(f, main_area, app),
        Overlay::None => {}
    }
}

fn render_failed(f: &mut Frame, area: Rect, failed: &[&str]) {
    let line = Line::from(vec![
        Span::styled(" ! ", theme::negative()),
        Span::styled(format!("Failed to load: {}", failed.join(", ")), theme::warning()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_tabs(f: &mut Frame, area: Rect, app: &AppState) {
    let titles: Vec<Line> = app
        .tabs
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.label())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab_index)
        .style(theme::muted())
        .highlight_style(theme::selected_tab())
        .divider(Span::styled("|", theme::muted()));
    f.render_widget(tabs, area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
