//! Theme and color definitions for the TUI.

use crate::types::RiskTier;
use ratatui::style::{Color, Modifier, Style};

/// Theme for the TUI with consistent color scheme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub muted: Color,
    /// SMA20 line.
    pub fast_average: Color,
    /// SMA50 line.
    pub slow_average: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Magenta,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            muted: Color::DarkGray,
            fast_average: Color::Yellow,
            slow_average: Color::Magenta,
        }
    }
}

impl Theme {
    /// Get style for titles.
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for headers.
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.danger)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Get style for the highlighted row.
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn tab_active(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Color a signal label: BUY green, SELL red, ERROR yellow.
    pub fn signal(&self, signal: &str) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD);
        match signal {
            "BUY" => style.fg(self.success),
            "SELL" => style.fg(self.danger),
            "HOLD" => style.fg(self.primary),
            _ => style.fg(self.warning),
        }
    }

    pub fn risk(&self, risk: RiskTier) -> Style {
        match risk {
            RiskTier::Low => Style::default().fg(self.success),
            RiskTier::Medium => Style::default().fg(self.warning),
            RiskTier::High => Style::default().fg(self.danger),
            RiskTier::Unknown => self.muted(),
        }
    }
}
