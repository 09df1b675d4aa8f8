//! Overlay widgets: help, add tickers, remove an added ticker.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::{centered_rect, help_panel};

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys (any key to close) ")
        .title_style(theme::accent_bold());

    f.render_widget(Paragraph::new(help_panel::lines()).block(block), popup);
}

pub fn render_add(f: &mut Frame, area: Rect, input: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Add tickers ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(Span::styled(
            "Comma separated, e.g. PLTR, UBER, BRK-B",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(input.to_string(), theme::text()),
            Span::styled("_", theme::accent().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(""),
        Line::from(Span::styled("Enter to add, Esc to cancel", theme::muted())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

pub fn render_remove(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(40, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Remove ticker ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = app
        .filters
        .extra_tickers()
        .iter()
        .enumerate()
        .map(|(i, ticker)| {
            if i == app.remove_cursor {
                Line::from(Span::styled(format!("> {ticker}"), theme::selected_tab()))
            } else {
                Line::from(Span::styled(format!("  {ticker}"), theme::text()))
            }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "j/k to move, Enter to remove, Esc to close",
        theme::muted(),
    )));

    f.render_widget(Paragraph::new(lines).block(block), popup);
}
