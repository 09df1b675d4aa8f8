//! Severity tiers: fixed drawdown breakpoints mapped to a label and a color pair.
//!
//! Intervals are half-open and evaluated top-down; the first match wins:
//!
//! | drawdown      | tier    |
//! |---------------|---------|
//! | dd > -5       | good    |
//! | dd > -10      | stable  |
//! | dd > -20      | caution |
//! | dd > -35      | alert   |
//! | otherwise     | danger  |

use serde::{Deserialize, Serialize};

/// Tier boundaries in percent, least to most severe.
pub const BREAKPOINTS: [f64; 4] = [-5.0, -10.0, -20.0, -35.0];

/// Drawdown at or below which an instrument counts as "danger" in summaries.
pub const DANGER_THRESHOLD: f64 = -35.0;

/// Drawdown at or below which an instrument counts as "caution or worse" in summaries.
pub const CAUTION_THRESHOLD: f64 = -20.0;

/// Discrete severity bucket. Variant order is least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Stable,
    Caution,
    Alert,
    Danger,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Good,
        Severity::Stable,
        Severity::Caution,
        Severity::Alert,
        Severity::Danger,
    ];

    /// Classify a drawdown percentage (≤ 0).
    pub fn from_drawdown(dd: f64) -> Self {
        if dd > BREAKPOINTS[0] {
            Severity::Good
        } else if dd > BREAKPOINTS[1] {
            Severity::Stable
        } else if dd > BREAKPOINTS[2] {
            Severity::Caution
        } else if dd > BREAKPOINTS[3] {
            Severity::Alert
        } else {
            Severity::Danger
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Good => "good",
            Severity::Stable => "stable",
            Severity::Caution => "caution",
            Severity::Alert => "alert",
            Severity::Danger => "danger",
        }
    }

    /// Foreground (text/bar) color as `#rrggbb`.
    pub fn foreground(self) -> &'static str {
        match self {
            Severity::Good => "#16a34a",
            Severity::Stable => "#15803d",
            Severity::Caution => "#b45309",
            Severity::Alert => "#c2410c",
            Severity::Danger => "#b91c1c",
        }
    }

    /// Background (card fill) color as `#rrggbb`.
    pub fn background(self) -> &'static str {
        match self {
            Severity::Good => "#f0fdf4",
            Severity::Stable => "#dcfce7",
            Severity::Caution => "#fffbeb",
            Severity::Alert => "#fff7ed",
            Severity::Danger => "#fef2f2",
        }
    }

    /// Human-readable range for legends, e.g. `"5-10%"`.
    pub fn range_label(self) -> &'static str {
        match self {
            Severity::Good => "0-5%",
            Severity::Stable => "5-10%",
            Severity::Caution => "10-20%",
            Severity::Alert => "20-35%",
            Severity::Danger => "35%+",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Shorthand for [`Severity::from_drawdown`].
pub fn tier(dd: f64) -> Severity {
    Severity::from_drawdown(dd)
}

/// Parse a `#rrggbb` color into its components.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_are_exclusive_on_the_upper_tier() {
        assert_eq!(tier(0.0), Severity::Good);
        assert_eq!(tier(-4.99), Severity::Good);
        assert_eq!(tier(-5.0), Severity::Stable);
        assert_eq!(tier(-10.0), Severity::Caution);
        assert_eq!(tier(-20.0), Severity::Alert);
        assert_eq!(tier(-35.0), Severity::Danger);
        assert_eq!(tier(-99.0), Severity::Danger);
    }

    #[test]
    fn labels() {
        let labels: Vec<&str> = Severity::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["good", "stable", "caution", "alert", "danger"]);
        assert_eq!(Severity::Alert.to_string(), "alert");
    }

    #[test]
    fn palette_colors_parse() {
        for s in Severity::ALL {
            assert!(parse_hex_color(s.foreground()).is_some());
            assert!(parse_hex_color(s.background()).is_some());
        }
        assert_eq!(parse_hex_color("#ff8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex_color("ff8000"), None);
        assert_eq!(parse_hex_color("#ff80"), None);
        assert_eq!(parse_hex_color("#12345g"), None);
    }

    #[test]
    fn multibyte_color_is_rejected_not_sliced() {
        // Six bytes, but the euro sign straddles the first channel.
        assert_eq!("a\u{20ac}bc".len(), 6);
        assert_eq!(parse_hex_color("#a\u{20ac}bc"), None);
        assert_eq!(parse_hex_color("#\u{e9}\u{e9}\u{e9}"), None);
    }
}
