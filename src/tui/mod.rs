//! Terminal dashboard for browsing signals, charts and the beginner guide.

mod app;
mod charts;
mod events;
mod guide;
mod signals;
mod state;
mod theme;

pub use app::{run_tui, App};
pub use theme::Theme;

/// Route/View enum for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Signals,
    Charts,
    Guide,
}

impl Route {
    /// Get all available routes.
    pub fn all() -> Vec<Self> {
        vec![Self::Signals, Self::Charts, Self::Guide]
    }

    /// Get the route name.
    pub fn name(&self) -> &str {
        match self {
            Self::Signals => "Signals",
            Self::Charts => "Charts",
            Self::Guide => "Guide",
        }
    }

    /// Get the route shortcut key.
    pub fn key(&self) -> char {
        match self {
            Self::Signals => '1',
            Self::Charts => '2',
            Self::Guide => '3',
        }
    }
}
