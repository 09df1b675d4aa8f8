//! Comparison chart: one bar per instrument passing the filter, in sort order.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

use drawdown_runner::view::REFERENCE_LINES;

use crate::app::AppState;
use crate::theme;

/// Bar heights are drawdown magnitudes in tenths of a percent.
const SCALE: f64 = 10.0;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let overview = app.overview();
    let items = &overview.items;

    // Keep the deepest reference line on scale.
    let deepest = REFERENCE_LINES
        .iter()
        .map(|(level, _)| level.abs())
        .fold(0.0, f64::max);
    let max_value = items
        .iter()
        .map(|r| r.drawdown_pct().abs())
        .fold(deepest, f64::max);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(" Drawdown comparison ")
        .title_style(theme::title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if items.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(" Nothing to chart", theme::muted())),
            rows[0],
        );
    } else {
        let (bar_width, bar_gap) = bar_geometry(rows[0].width, items.len());
        let shown = visible_bars(rows[0].width, bar_width, bar_gap).min(items.len());

        let bars: Vec<Bar> = items[..shown]
            .iter()
            .map(|r| {
                let style = theme::severity(r.severity());
                Bar::default()
                    .value((r.drawdown_pct().abs() * SCALE).round() as u64)
                    .text_value(format!("{:.1}", r.drawdown_pct()))
                    .label(Line::from(r.ticker().to_string()))
                    .style(style)
                    .value_style(
                        Style::default()
                            .fg(theme::TEXT)
                            .bg(theme::severity_color(r.severity())),
                    )
            })
            .collect();

        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(bar_gap)
            .max((max_value * SCALE).ceil() as u64)
            .label_style(theme::muted());
        f.render_widget(chart, rows[0]);

        if shown < items.len() {
            let note = format!(" {shown} of {} shown ", items.len());
            let note_width = (note.len() as u16).min(rows[0].width);
            let note_area = Rect {
                x: rows[0].x + rows[0].width - note_width,
                y: rows[0].y,
                width: note_width,
                height: 1,
            };
            f.render_widget(Paragraph::new(Span::styled(note, theme::muted())), note_area);
        }
    }

    f.render_widget(Paragraph::new(legend()), rows[1]);
}

/// Widest bars that fit every item, from 7 columns down to 1.
fn bar_geometry(width: u16, count: usize) -> (u16, u16) {
    let count = count.max(1) as u16;
    for bar_width in (3..=7u16).rev() {
        if (bar_width + 1).saturating_mul(count) <= width {
            return (bar_width, 1);
        }
    }
    if 2u16.saturating_mul(count) <= width {
        (1, 1)
    } else {
        (1, 0)
    }
}

fn visible_bars(width: u16, bar_width: u16, bar_gap: u16) -> usize {
    let step = (bar_width + bar_gap).max(1);
    ((width + bar_gap) / step) as usize
}

fn legend() -> Line<'static> {
    let mut spans = vec![Span::styled(" Reference:", theme::muted())];
    for (level, severity) in REFERENCE_LINES {
        spans.push(Span::styled(format!("  {level:.0}%"), theme::severity_bold(severity)));
        spans.push(Span::styled(format!(" {}", severity.label()), theme::muted()));
    }
    Line::from(spans)
}
