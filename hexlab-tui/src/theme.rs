//! Parrot/neon theme tokens for the hexlab TUI
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (primary highlights, focus)
//! - **Positive**: Neon green (up bars, bullish outlook)
//! - **Negative**: Hot pink (down bars, bearish outlook, errors)
//! - **Warning**: Neon orange (moving lines, alerts)
//! - **Neutral**: Cool purple (neutral outlook, secondary info)
//! - **Muted**: Steel blue (disabled, secondary text)

use ratatui::style::{Color, Modifier, Style};

use hexlab_core::domain::LineValue;
use hexlab_core::knowledge::Outlook;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub const fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Up (and flat) bars green, down bars pink.
    pub fn change_color(&self, change: f64) -> Color {
        if change >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn outlook_color(&self, outlook: Outlook) -> Color {
        match outlook {
            Outlook::Bullish => self.positive,
            Outlook::Bearish => self.negative,
            Outlook::Neutral => self.neutral,
        }
    }

    /// Moving lines stand out; settled lines use the primary text color.
    pub fn line_color(&self, value: LineValue) -> Color {
        if value.is_moving() {
            self.warning
        } else {
            self.text_primary
        }
    }
}

const PALETTE: Theme = Theme::parrot_neon();

/// Frame background.
pub fn base() -> Style {
    Style::default()
        .bg(PALETTE.background)
        .fg(PALETTE.text_primary)
}

pub fn accent() -> Style {
    Style::default().fg(PALETTE.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(PALETTE.muted)
}

pub fn neutral() -> Style {
    Style::default().fg(PALETTE.neutral)
}

pub fn negative() -> Style {
    Style::default().fg(PALETTE.negative)
}

pub fn warning() -> Style {
    Style::default().fg(PALETTE.warning)
}

pub fn text() -> Style {
    Style::default().fg(PALETTE.text_primary)
}

/// A card with nothing new to say.
pub fn dimmed() -> Style {
    Style::default()
        .fg(PALETTE.text_secondary)
        .add_modifier(Modifier::DIM)
}

pub fn change(change: f64) -> Style {
    Style::default().fg(PALETTE.change_color(change))
}

pub fn outlook(outlook: Outlook) -> Style {
    Style::default()
        .fg(PALETTE.outlook_color(outlook))
        .add_modifier(Modifier::BOLD)
}

pub fn line(value: LineValue) -> Style {
    Style::default().fg(PALETTE.line_color(value))
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}
