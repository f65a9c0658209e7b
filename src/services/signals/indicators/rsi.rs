//! Relative Strength Index (RSI) indicator.

use super::{ensure_prices, Column, Indicator};
use crate::error::Result;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold (potential buy signal)
/// - Above 70: Overbought (potential sell signal)
///
/// Uses Wilder smoothing: the first average gain/loss is the simple mean of
/// the first `period` deltas, then `avg = (avg * (period - 1) + x) / period`.
/// A window with no losses reads 100.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    fn value(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            return 100.0;
        }
        let rs = avg_gain / avg_loss;
        (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
    }
}

impl Indicator for Rsi {
    type Output = Column;

    fn id(&self) -> &str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, prices: &[f64]) -> Result<Column> {
        ensure_prices(prices)?;

        let mut out = vec![None; prices.len()];
        if self.period == 0 || prices.len() < self.min_periods() {
            return Ok(out);
        }

        let period = self.period as f64;
        let mut gains = Vec::with_capacity(prices.len() - 1);
        let mut losses = Vec::with_capacity(prices.len() - 1);

        for w in prices.windows(2) {
            let change = w[1] - w[0];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        // Calculate initial averages
        let mut avg_gain = gains.iter().take(self.period).sum::<f64>() / period;
        let mut avg_loss = losses.iter().take(self.period).sum::<f64>() / period;
        out[self.period] = Some(Self::value(avg_gain, avg_loss));

        // Delta j is the move into bar j + 1.
        for j in self.period..gains.len() {
            avg_gain = (avg_gain * (period - 1.0) + gains[j]) / period;
            avg_loss = (avg_loss * (period - 1.0) + losses[j]) / period;
            out[j + 1] = Some(Self::value(avg_gain, avg_loss));
        }

        Ok(out)
    }
}
