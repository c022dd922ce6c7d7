use iced::{Background, Border, Color, Shadow, Theme};
use iced::widget::container::{StyleSheet, Appearance};

use crate::view::Tone;

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::from_rgb8(0x00, 0xE6, 0x76),
        Tone::Warning => Color::from_rgb8(0xFA, 0xCC, 0x15),
        Tone::Danger => Color::from_rgb8(0xEF, 0x44, 0x44),
        Tone::Neutral => Color::from_rgb8(0x9C, 0xA3, 0xAF),
    }
}

/// Pill shaped "Online" / "Offline" badge.
pub struct BadgeStyleSheet(pub Tone);

impl StyleSheet for BadgeStyleSheet {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> Appearance {
        let color = tone_color(self.0);

        Appearance {
            text_color: Some(color),
            background: Some(Background::Color(Color { a: 0.08, ..color })),
            border: Border {
                color: Color { a: 0.3, ..color },
                width: 1.0,
                radius: 12.0.into(),
            },
            shadow: Shadow::default(),
        }
    }
}

/// Rounded card the panels and tiles are drawn on.
pub struct CardStyleSheet;

impl StyleSheet for CardStyleSheet {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> Appearance {
        Appearance {
            text_color: None,
            background: Some(Background::Color(Color::from_rgb8(0x1C, 0x1C, 0x1E))),
            border: Border {
                color: Color { a: 0.05, ..Color::WHITE },
                width: 1.0,
                radius: 24.0.into(),
            },
            shadow: Shadow::default(),
        }
    }
}
