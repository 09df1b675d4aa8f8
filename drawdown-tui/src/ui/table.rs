//! Data table: the selected tab's rows with every exported column.

use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} · press e to export ", app.current_tab().label()))
        .title_style(theme::title());

    let items = app.current_items();
    if items.is_empty() {
        let msg = Paragraph::new(Span::styled(
            " No instruments match the current filter",
            theme::muted(),
        ))
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        ["Category", "Ticker", "Name", "Current", "High", "Drawdown", "Diff", "Severity"]
            .into_iter()
            .map(|h| Cell::from(h).style(theme::accent_bold())),
    );

    let rows: Vec<Row> = items
        .iter()
        .skip(app.scroll)
        .map(|r| {
            let d = &r.drawdown;
            let severity = r.severity();
            Row::new(vec![
                Cell::from(r.instrument.category.clone())
                    .style(theme::category(&r.instrument.category_color)),
                Cell::from(r.ticker().to_string()).style(theme::title()),
                Cell::from(r.instrument.display_name.clone()).style(theme::text()),
                Cell::from(format!("{:>10.2}", d.current)),
                Cell::from(format!("{:>10.2}", d.high)),
                Cell::from(format!("{:>8.2}%", d.drawdown_pct))
                    .style(theme::severity_bold(severity)),
                Cell::from(format!("{:>10.2}", d.diff)).style(theme::severity(severity)),
                Cell::from(severity.label()).style(theme::severity_badge(severity)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(30),
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .style(theme::text())
        .column_spacing(1);
    f.render_widget(table, area);
}
