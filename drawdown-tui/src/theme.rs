//! Style tokens for the dashboard.
//!
//! Chrome uses a small dark-terminal palette. Severity tiers and catalog
//! categories carry their own `#rrggbb` colors, which are converted here.

use ratatui::style::{Color, Modifier, Style};

use drawdown_core::severity::{parse_hex_color, Severity};

pub const ACCENT: Color = Color::Rgb(96, 165, 250);
pub const MUTED: Color = Color::Rgb(148, 163, 184);
pub const WARNING: Color = Color::Rgb(251, 191, 36);
pub const NEGATIVE: Color = Color::Rgb(248, 113, 113);
pub const TEXT: Color = Color::White;
pub const TRACK: Color = Color::Rgb(229, 231, 235);

/// `#rrggbb` to a terminal color; malformed input falls back to `MUTED`.
pub fn hex(color: &str) -> Color {
    parse_hex_color(color)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(MUTED)
}

/// Foreground color of a severity tier.
pub fn severity_color(severity: Severity) -> Color {
    hex(severity.foreground())
}

/// Card background tint of a severity tier.
pub fn severity_background(severity: Severity) -> Color {
    hex(severity.background())
}

pub fn severity(severity: Severity) -> Style {
    Style::default().fg(severity_color(severity))
}

pub fn severity_bold(s: Severity) -> Style {
    severity(s).add_modifier(Modifier::BOLD)
}

/// Tier label on its tinted background.
pub fn severity_badge(severity: Severity) -> Style {
    Style::default()
        .fg(severity_color(severity))
        .bg(severity_background(severity))
        .add_modifier(Modifier::BOLD)
}

pub fn category(color: &str) -> Style {
    Style::default().fg(hex(color))
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn title() -> Style {
    text().add_modifier(Modifier::BOLD)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn selected_tab() -> Style {
    accent_bold().add_modifier(Modifier::REVERSED)
}
