//! Simple Moving Average (SMA) indicator.

use super::{ensure_prices, Column, Indicator};
use crate::error::Result;

/// SMA (Simple Moving Average) indicator.
///
/// Mean of the trailing `period` prices ending at each bar.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = Column;

    fn id(&self) -> &str {
        match self.period {
            20 => "sma20",
            50 => "sma50",
            _ => "sma",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, prices: &[f64]) -> Result<Column> {
        ensure_prices(prices)?;

        let mut out = vec![None; prices.len()];
        if self.period == 0 || prices.len() < self.period {
            return Ok(out);
        }

        // Each window is summed on its own so no rounding error carries over.
        for (i, window) in prices.windows(self.period).enumerate() {
            let mean = window.iter().sum::<f64>() / self.period as f64;
            out[i + self.period - 1] = Some(mean);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_id() {
        assert_eq!(Sma::new(20).id(), "sma20");
        assert_eq!(Sma::new(50).id(), "sma50");
        assert_eq!(Sma::new(7).id(), "sma");
    }

    #[test]
    fn test_sma_first_value_is_exact_mean() {
        let prices: Vec<f64> = (1..=50).map(|i| i as f64).collect();
        let out = Sma::new(20).calculate(&prices).unwrap();
        assert_eq!(out.len(), 50);
        assert!(out[..19].iter().all(Option::is_none));
        let expected = (1..=20).sum::<i32>() as f64 / 20.0;
        assert_eq!(out[19], Some(expected));
        assert_eq!(out[49], Some((31..=50).sum::<i32>() as f64 / 20.0));
    }

    #[test]
    fn test_sma_insufficient_data() {
        let out = Sma::new(20).calculate(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn test_sma_empty_is_error() {
        assert!(Sma::new(20).calculate(&[]).is_err());
    }

    #[test]
    fn test_sma_window_of_one_is_identity() {
        let prices = [3.0, 1.5, 2.25];
        let out = Sma::new(1).calculate(&prices).unwrap();
        assert_eq!(out, vec![Some(3.0), Some(1.5), Some(2.25)]);
    }
}
