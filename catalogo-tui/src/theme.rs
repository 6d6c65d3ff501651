//! Color themes and the status-to-color mappings used by the views.

use crate::notifications::NotificationLevel;
use catalogo_core::RatingBand;
use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Theme {
    pub fn synthbrute() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_secondary: Color::Rgb(26, 26, 26),
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            primary_dim: Color::Rgb(0, 136, 136),
            secondary: Color::Rgb(255, 0, 255),
            tertiary: Color::Rgb(255, 255, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 170, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            text_muted: Color::Rgb(68, 68, 68),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }

    /// Terminal default palette, for terminals without true color.
    pub fn mono() -> Self {
        Self {
            bg: Color::Reset,
            bg_secondary: Color::Reset,
            bg_highlight: Color::DarkGray,
            primary: Color::White,
            primary_dim: Color::Gray,
            secondary: Color::White,
            tertiary: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            text: Color::Reset,
            text_dim: Color::Gray,
            text_muted: Color::DarkGray,
            border: Color::Gray,
            border_focus: Color::White,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "synthbrute" => Some(Self::synthbrute()),
            "mono" => Some(Self::mono()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::synthbrute()
    }
}

pub fn rating_band_color(band: RatingBand, theme: &Theme) -> Color {
    match band {
        RatingBand::High => theme.success,
        RatingBand::Medium => theme.info,
        RatingBand::Low => theme.warning,
        RatingBand::Critical => theme.error,
    }
}

pub fn active_color(activo: bool, theme: &Theme) -> Color {
    if activo {
        theme.text
    } else {
        theme.text_muted
    }
}

pub fn notification_color(level: NotificationLevel, theme: &Theme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}
