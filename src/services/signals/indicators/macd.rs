//! MACD (Moving Average Convergence Divergence) indicator.

use super::{ensure_prices, Column, Ema, Indicator};
use crate::error::Result;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

/// The three MACD columns, each as long as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdColumns {
    pub macd: Column,
    pub signal: Column,
    pub histogram: Column,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdColumns;

    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        (self.slow_period + self.signal_period).saturating_sub(1)
    }

    fn calculate(&self, prices: &[f64]) -> Result<MacdColumns> {
        ensure_prices(prices)?;

        let fast_ema = Ema::new(self.fast_period).calculate(prices)?;
        let slow_ema = Ema::new(self.slow_period).calculate(prices)?;

        let macd: Column = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect();

        let signal = Ema::new(self.signal_period).over(&macd);

        let histogram: Column = macd
            .iter()
            .zip(signal.iter())
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m - s),
                _ => None,
            })
            .collect();

        Ok(MacdColumns {
            macd,
            signal,
            histogram,
        })
    }
}
