//! Title line with the session settings, and a loading gauge while fetching.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{LineGauge, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let updated = match app.last_updated {
        Some(at) => format!("Updated {}", at.format("%Y-%m-%d %H:%M:%S")),
        None => "Not loaded yet".to_string(),
    };

    let title = Line::from(vec![
        Span::styled(" Drawdown Monitor ", theme::accent_bold()),
        Span::styled("| ", theme::muted()),
        Span::styled("vs ", theme::muted()),
        Span::styled(app.filters.mode.label(), theme::title()),
        Span::styled(" | sort ", theme::muted()),
        Span::styled(app.filters.sort.label(), theme::text()),
        Span::styled(" | filter ", theme::muted()),
        Span::styled(app.filters.min_drawdown.label(), theme::text()),
        Span::styled(format!(" | {} | {updated}", app.provider_name), theme::muted()),
    ]);
    f.render_widget(Paragraph::new(title), rows[0]);

    match &app.loading {
        Some(loading) => {
            let mut label = match &loading.current {
                Some(ticker) => format!(" Loading {ticker} ({}/{})", loading.done, loading.total),
                None => format!(" Loading ({}/{})", loading.done, loading.total),
            };
            if loading.cached > 0 {
                label.push_str(&format!(", {} cached", loading.cached));
            }
            if let Some(failure) = &loading.last_failure {
                label.push_str(&format!(", last failure {failure}"));
            }
            label.push(' ');
            let gauge = LineGauge::default()
                .ratio(loading.ratio())
                .label(Span::styled(label, theme::accent()))
                .filled_style(theme::accent())
                .unfilled_style(theme::muted())
                .line_set(symbols::line::THICK);
            f.render_widget(gauge, rows[1]);
        }
        None => {
            let tracked = app.instruments().len();
            let line = Line::from(Span::styled(
                format!(
                    " {tracked} tickers tracked, {} with data. Press ? for keys.",
                    app.results.len()
                ),
                theme::muted(),
            ));
            f.render_widget(Paragraph::new(line), rows[1]);
        }
    }
}
