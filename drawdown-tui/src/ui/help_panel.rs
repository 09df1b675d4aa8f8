//! Key reference shown in the help overlay.

use ratatui::text::{Line, Span};

use drawdown_core::severity::Severity;

use crate::theme;

pub fn lines() -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "View");
    key(&mut lines, "m", "Toggle 52-week high / all-time high");
    key(&mut lines, "s", "Cycle sort: worst first, best first, alphabetical");
    key(&mut lines, "[ / ]", "Lower / raise the minimum drawdown filter");
    key(&mut lines, "← / →", "Previous / next tab");
    key(&mut lines, "j / k", "Scroll cards or table");
    key(&mut lines, "c", "Show / hide the comparison chart");
    key(&mut lines, "t", "Switch between cards and table");
    lines.push(Line::from(""));

    section(&mut lines, "Data");
    key(&mut lines, "a", "Add tickers (comma separated)");
    key(&mut lines, "x", "Remove an added ticker");
    key(&mut lines, "r", "Clear the price cache and reload");
    key(&mut lines, "e", "Export drawdown.csv");
    lines.push(Line::from(""));

    section(&mut lines, "Severity");
    for s in Severity::ALL {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>12}  ", s.label()), theme::severity_badge(s)),
            Span::styled(format!(" down {}", s.range_label()), theme::muted()),
        ]));
    }
    lines.push(Line::from(""));

    section(&mut lines, "General");
    key(&mut lines, "?", "This help");
    key(&mut lines, "q / Ctrl+C", "Quit");

    lines
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'static>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>12}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
