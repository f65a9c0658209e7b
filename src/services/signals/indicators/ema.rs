//! Exponential Moving Average (EMA) indicator.

use super::{ensure_prices, Column, Indicator};
use crate::error::Result;

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. The first value is the
/// SMA of the first `period` inputs; after that
/// `ema = (x - ema) * k + ema` with `k = 2 / (period + 1)`.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    fn multiplier(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// EMA over a column that may have undefined leading entries.
    ///
    /// Undefined entries are skipped; the seed is the mean of the first
    /// `period` defined values. Output is aligned with `values`.
    pub fn over(&self, values: &[Option<f64>]) -> Column {
        let mut out = vec![None; values.len()];
        if self.period == 0 {
            return out;
        }

        let k = self.multiplier();
        let mut seed_sum = 0.0;
        let mut seen = 0usize;
        let mut ema: Option<f64> = None;

        for (i, value) in values.iter().enumerate() {
            let Some(x) = *value else {
                continue;
            };

            match ema {
                Some(prev) => {
                    let next = (x - prev) * k + prev;
                    ema = Some(next);
                    out[i] = Some(next);
                }
                None => {
                    seed_sum += x;
                    seen += 1;
                    if seen == self.period {
                        let seed = seed_sum / self.period as f64;
                        ema = Some(seed);
                        out[i] = Some(seed);
                    }
                }
            }
        }

        out
    }
}

impl Indicator for Ema {
    type Output = Column;

    fn id(&self) -> &str {
        match self.period {
            12 => "ema12",
            26 => "ema26",
            _ => "ema",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, prices: &[f64]) -> Result<Column> {
        ensure_prices(prices)?;
        let values: Column = prices.iter().copied().map(Some).collect();
        Ok(self.over(&values))
    }
}
