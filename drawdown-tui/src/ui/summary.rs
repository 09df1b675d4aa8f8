//! Summary metrics row over everything that passes the filter.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use drawdown_core::severity::Severity;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(" Summary ")
        .title_style(theme::title());

    let overview = app.overview();
    let line = match overview.summary {
        Some(s) => Line::from(vec![
            Span::styled(" Instruments ", theme::muted()),
            Span::styled(s.count.to_string(), theme::title()),
            Span::styled("   Avg ", theme::muted()),
            Span::styled(
                format!("{:.1}%", s.mean_drawdown),
                theme::severity_bold(Severity::from_drawdown(s.mean_drawdown)),
            ),
            Span::styled("   Worst ", theme::muted()),
            Span::styled(
                format!("{} {:.1}%", s.worst_ticker, s.worst_drawdown),
                theme::severity_bold(Severity::from_drawdown(s.worst_drawdown)),
            ),
            Span::styled("   Best ", theme::muted()),
            Span::styled(
                format!("{} {:.1}%", s.best_ticker, s.best_drawdown),
                theme::severity_bold(Severity::from_drawdown(s.best_drawdown)),
            ),
            Span::styled("   Down 35%+ ", theme::muted()),
            Span::styled(s.danger_count.to_string(), theme::severity_bold(Severity::Danger)),
            Span::styled("   Down 20%+ ", theme::muted()),
            Span::styled(s.caution_count.to_string(), theme::severity_bold(Severity::Caution)),
        ]),
        None if app.results.is_empty() => {
            Line::from(Span::styled(" No instruments loaded", theme::muted()))
        }
        None => Line::from(Span::styled(
            format!(" No instruments match (filter: {})", app.filters.min_drawdown.label()),
            theme::muted(),
        )),
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}
