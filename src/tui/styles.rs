//! Color palette and preset styles.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{BmiCategory, LifestyleRisk};

/// Palette for the premium predictor screens.
pub struct Theme;

impl Theme {
    /// Deep blue accent
    pub const PRIMARY: Color = Color::Rgb(37, 99, 235); // #2563EB

    /// Light blue for focus and highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(96, 165, 250); // #60A5FA

    /// Border gray
    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for a predicted category label. Labels the palette does not
    /// know fall back to the info color.
    #[must_use]
    pub fn category(label: &str) -> Style {
        let base = match label.to_ascii_lowercase().as_str() {
            "low" => Self::success(),
            "medium" => Self::warning(),
            "high" => Self::danger(),
            _ => Self::info(),
        };
        base.add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn lifestyle_risk(risk: LifestyleRisk) -> Style {
        match risk {
            LifestyleRisk::Low => Self::success(),
            LifestyleRisk::Medium => Self::warning(),
            LifestyleRisk::High => Self::danger(),
        }
    }

    #[must_use]
    pub fn bmi_category(category: BmiCategory) -> Style {
        match category {
            BmiCategory::Normal => Self::success(),
            BmiCategory::Underweight | BmiCategory::Overweight => Self::warning(),
            BmiCategory::Obese => Self::danger(),
        }
    }
}
