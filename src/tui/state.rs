//! Dashboard view state: coin selection, history window and panel toggles.

use crate::config::Config;
use crate::services::{CoinDetail, Dashboard};
use crate::types::Coin;

pub const MIN_DAYS: u32 = 90;
pub const MAX_DAYS: u32 = 730;
pub const DAYS_STEP: u32 = 10;

/// Coins selected when the dashboard opens or the universe changes.
const DEFAULT_SELECTION: usize = 3;

pub struct ViewState {
    pub beginner: bool,
    pub days: u32,
    pub show_rsi: bool,
    pub show_macd: bool,
    /// Row under the cursor in the coin picker.
    pub cursor: usize,
    /// Index into [`ViewState::chart_details`].
    pub chart_focus: usize,
    selected: Vec<String>,
    pub board: Option<Dashboard>,
    pub status: Option<String>,
}

impl ViewState {
    pub fn new(config: &Config) -> Self {
        let mut state = Self {
            beginner: true,
            days: config.default_days.clamp(MIN_DAYS, MAX_DAYS),
            show_rsi: true,
            show_macd: true,
            cursor: 0,
            chart_focus: 0,
            selected: Vec::new(),
            board: None,
            status: None,
        };
        state.select_defaults(config);
        state
    }

    /// Coins offered in the picker for the current mode.
    pub fn universe<'a>(&self, config: &'a Config) -> &'a [Coin] {
        if self.beginner {
            config.beginner_coins()
        } else {
            &config.coins
        }
    }

    pub fn is_selected(&self, coin_id: &str) -> bool {
        self.selected.iter().any(|id| id == coin_id)
    }

    /// Selected coins in universe order.
    pub fn selected_coins(&self, config: &Config) -> Vec<Coin> {
        self.universe(config)
            .iter()
            .filter(|c| self.is_selected(&c.id))
            .cloned()
            .collect()
    }

    pub fn move_cursor(&mut self, delta: isize, config: &Config) {
        let len = self.universe(config).len();
        self.cursor = step(self.cursor, delta, len);
    }

    /// Toggle the coin under the cursor. Returns true if the selection changed.
    pub fn toggle_at_cursor(&mut self, config: &Config) -> bool {
        let Some(coin) = self.universe(config).get(self.cursor) else {
            return false;
        };

        if let Some(pos) = self.selected.iter().position(|id| *id == coin.id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(coin.id.clone());
        }
        true
    }

    /// Switch between the beginner and full universe, keeping what still applies.
    pub fn toggle_beginner(&mut self, config: &Config) {
        self.beginner = !self.beginner;

        let universe = self.universe(config);
        self.selected
            .retain(|id| universe.iter().any(|c| c.id == *id));
        if self.selected.is_empty() {
            self.select_defaults(config);
        }

        let len = self.universe(config).len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Widen or narrow the history window. Returns true if it changed.
    pub fn adjust_days(&mut self, wider: bool) -> bool {
        let days = if wider {
            (self.days + DAYS_STEP).min(MAX_DAYS)
        } else {
            self.days.saturating_sub(DAYS_STEP).max(MIN_DAYS)
        };
        let changed = days != self.days;
        self.days = days;
        changed
    }

    pub fn set_board(&mut self, board: Dashboard) {
        self.board = Some(board);
        let len = self.chart_details().len();
        self.chart_focus = self.chart_focus.min(len.saturating_sub(1));
    }

    /// Computed coins in board order.
    pub fn chart_details(&self) -> Vec<&CoinDetail> {
        let Some(board) = &self.board else {
            return Vec::new();
        };
        board
            .rows
            .iter()
            .filter_map(|row| board.details.get(&row.coin_id))
            .collect()
    }

    pub fn focused_detail(&self) -> Option<&CoinDetail> {
        self.chart_details().get(self.chart_focus).copied()
    }

    pub fn move_chart_focus(&mut self, delta: isize) {
        let len = self.chart_details().len();
        self.chart_focus = step(self.chart_focus, delta, len);
    }

    fn select_defaults(&mut self, config: &Config) {
        self.selected = self
            .universe(config)
            .iter()
            .take(DEFAULT_SELECTION)
            .map(|c| c.id.clone())
            .collect();
    }
}

fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}
