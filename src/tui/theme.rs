//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::config::ThemePreference;
use crate::scoring::color::{self, Rgb};

/// Marker colors for solutions on the ternary chart, cycled in order
pub const SERIES: [Color; 10] = [
    Color::Rgb(0x63, 0x6e, 0xfa),
    Color::Rgb(0xef, 0x55, 0x3b),
    Color::Rgb(0x00, 0xcc, 0x96),
    Color::Rgb(0xab, 0x63, 0xfa),
    Color::Rgb(0xff, 0xa1, 0x5a),
    Color::Rgb(0x19, 0xd3, 0xf3),
    Color::Rgb(0xff, 0x66, 0x92),
    Color::Rgb(0xb6, 0xe8, 0x80),
    Color::Rgb(0xff, 0x97, 0xff),
    Color::Rgb(0xfe, 0xcb, 0x52),
];

pub fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub title_color: Color,
    pub muted: Color,

    // Table
    pub header_style: Style,
    pub row_selected: Style,

    // Tabs
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,

    // Ternary chart
    pub axis_color: Color,
    pub guide_color: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            title_color: Color::Cyan,
            muted: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
            axis_color: Color::White,
            guide_color: Color::DarkGray,
        }
    }

    pub fn light() -> Self {
        Self {
            title_color: Color::Blue,
            muted: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Gray),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
            axis_color: Color::Black,
            guide_color: Color::Gray,
        }
    }

    /// Cell style for a 0..=10 value: gradient background, dark text
    pub fn score_style(&self, value: f64) -> Style {
        gradient_style(color::score_color(value))
    }

    /// Cell style for a criterion the solution never scored
    pub fn no_data_style(&self) -> Style {
        gradient_style(color::NO_DATA)
    }
}

fn gradient_style(bg: Rgb) -> Style {
    Style::new()
        .bg(Color::Rgb(bg.r, bg.g, bg.b))
        .fg(Color::Rgb(color::TEXT.r, color::TEXT.g, color::TEXT.b))
}

/// Pick the palette for a preference, probing the terminal background for `auto`
pub fn resolve_theme(preference: ThemePreference) -> ThemeColors {
    match preference {
        ThemePreference::Dark => ThemeColors::dark(),
        ThemePreference::Light => ThemeColors::light(),
        ThemePreference::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            Ok(_) => ThemeColors::dark(),
            Err(e) => {
                tracing::debug!(error = %e, "could not detect terminal background");
                ThemeColors::dark()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_preferences() {
        assert_eq!(resolve_theme(ThemePreference::Dark).title_color, Color::Cyan);
        assert_eq!(resolve_theme(ThemePreference::Light).title_color, Color::Blue);
    }

    #[test]
    fn test_score_style_uses_gradient() {
        let style = ThemeColors::dark().score_style(10.0);
        assert_eq!(style.bg, Some(Color::Rgb(200, 255, 200)));
        assert_eq!(style.fg, Some(Color::Rgb(0x33, 0x33, 0x33)));
        assert_eq!(
            ThemeColors::light().no_data_style().bg,
            Some(Color::Rgb(0xf5, 0xf5, 0xf5))
        );
    }

    #[test]
    fn test_series_cycles() {
        assert_eq!(series_color(0), series_color(SERIES.len()));
        assert_ne!(series_color(0), series_color(1));
    }
}
