//! Clinical color palette and preset styles.
//!
//! High-contrast teal/slate palette; semantic colors carry diagnosis
//! status across the form, history, and result views.

use ratatui::style::{Color, Modifier, Style};

use crate::domain;

/// Clinical theme for the whole interface.
pub struct ClinicalTheme;

impl ClinicalTheme {
    /// Deep teal, the primary accent
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights and focus
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Darker teal for the header band
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    /// Slate for idle borders and chrome
    pub const SLATE: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Emerald: healthy / success
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Amber: non-healthy history badges, cautions
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Rose: pathology badges and errors
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Blue: neutral progress notes
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    /// Near-black backdrop
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    /// Raised surface (popups)
    pub const BG_SURFACE: Color = Color::Rgb(30, 41, 59); // #1E293B

    /// Primary text
    pub const TEXT: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    /// Secondary text
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Muted text (hints, placeholders)
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    /// Style for view titles
    #[must_use]
    pub fn title() -> Style {
        Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
    }

    /// Style for section subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text
    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Style for secondary text
    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for muted text
    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    /// Style for success messages
    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Style for warnings
    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Style for errors
    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for progress notes
    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for the selected tab
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the focused form field
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for idle borders
    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SLATE)
    }

    /// Style for the focused pane border
    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for the header band
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key hint descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Badge style for a diagnosis in the result view: healthy is the only
    /// green outcome, everything else is rendered as pathology.
    #[must_use]
    pub fn diagnosis_badge(code: &str) -> Style {
        if domain::is_healthy(code) {
            Self::success().add_modifier(Modifier::BOLD)
        } else {
            Self::danger().add_modifier(Modifier::BOLD)
        }
    }

    /// Badge style for a history row: green iff healthy, amber otherwise.
    #[must_use]
    pub fn history_badge(code: &str) -> Style {
        if domain::is_healthy(code) {
            Self::success()
        } else {
            Self::warning()
        }
    }

    /// Bar style for a probability entry; dominant entries (> 0.5) are
    /// emphasized.
    #[must_use]
    pub fn probability(value: f64) -> Style {
        if value > 0.5 {
            Style::default()
                .fg(Self::PRIMARY_LIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::SLATE)
        }
    }
}
