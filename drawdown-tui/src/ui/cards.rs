//! Card grid: three instruments per row, each with a drawdown bar and a
//! mini chart of its recent closes.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LineGauge, Paragraph};
use ratatui::Frame;

use drawdown_runner::view::{bar_fill, card_history, CARDS_PER_ROW};
use drawdown_runner::InstrumentDrawdown;

use crate::app::AppState;
use crate::theme;

const CARD_HEIGHT: u16 = 10;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let items = app.current_items();
    if items.is_empty() {
        render_empty(f, area, app);
        return;
    }

    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let rows: Vec<&[&InstrumentDrawdown]> = items.chunks(CARDS_PER_ROW).collect();
    let first = app.scroll.min(rows.len().saturating_sub(1));

    let constraints = vec![Constraint::Length(CARD_HEIGHT); visible_rows];
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (row, row_area) in rows.iter().skip(first).zip(row_areas.iter()) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, CARDS_PER_ROW as u32); CARDS_PER_ROW])
            .split(*row_area);
        for (item, cell) in row.iter().zip(cells.iter()) {
            render_card(f, *cell, item);
        }
    }
}

fn render_empty(f: &mut Frame, area: Rect, app: &AppState) {
    let msg = if app.is_loading() && app.results.is_empty() {
        "Loading prices...".to_string()
    } else {
        format!(
            "No instruments match the current filter ({}). Press [ to lower it.",
            app.filters.min_drawdown.label()
        )
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {msg}"), theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_card(f: &mut Frame, area: Rect, item: &InstrumentDrawdown) {
    let severity = item.severity();
    let d = &item.drawdown;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::category(&item.instrument.category_color))
        .title(Line::from(vec![
            Span::styled(format!(" {} ", item.ticker()), theme::title()),
            Span::styled(format!("{} ", item.instrument.display_name), theme::muted()),
        ]))
        .title_bottom(Line::from(Span::styled(
            format!(" {} ", severity.label().to_uppercase()),
            theme::severity_badge(severity),
        )));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let headline = Line::from(vec![
        Span::styled(format!("{:.2}%", d.drawdown_pct), theme::severity_bold(severity)),
        Span::styled(format!("  {:+.2}", d.diff), theme::severity(severity)),
    ]);
    f.render_widget(Paragraph::new(headline), rows[0]);

    let prices = Line::from(vec![
        Span::styled("now ", theme::muted()),
        Span::styled(format!("{:.2}", d.current), theme::text()),
        Span::styled("  high ", theme::muted()),
        Span::styled(format!("{:.2}", d.high), theme::text()),
    ]);
    f.render_widget(Paragraph::new(prices), rows[1]);

    let gauge = LineGauge::default()
        .ratio(bar_fill(d.drawdown_pct) / 100.0)
        .label("")
        .filled_style(theme::severity(severity))
        .unfilled_style(Style::default().fg(theme::TRACK))
        .line_set(symbols::line::THICK);
    f.render_widget(gauge, rows[2]);

    render_mini_chart(f, rows[3], item);
}

fn render_mini_chart(f: &mut Frame, area: Rect, item: &InstrumentDrawdown) {
    let history = card_history(&item.drawdown);
    if history.len() < 2 || area.height == 0 {
        return;
    }

    let data: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.close))
        .collect();
    let min_y = history.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
    let max_y = history.iter().map(|p| p.close).fold(f64::NEG_INFINITY, f64::max);
    let padding = ((max_y - min_y) * 0.05).max(f64::EPSILON);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .style(theme::severity(item.severity()))
        .graph_type(GraphType::Line)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .x_axis(Axis::default().bounds([0.0, (history.len() - 1) as f64]))
        .y_axis(Axis::default().bounds([min_y - padding, max_y + padding]));
    f.render_widget(chart, area);
}
