//! Technical indicator implementations.
//!
//! Every indicator maps a price slice to one or more columns of the same
//! length as its input. Leading entries without enough lookback are `None`.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::Ema;
pub use macd::{Macd, MacdColumns};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::error::{AppError, Result};

/// An indicator column aligned with its input series.
pub type Column = Vec<Option<f64>>;

/// Trait for implementing technical indicators.
pub trait Indicator {
    /// What one calculation produces (a column, or several).
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Minimum number of prices before the first value is defined.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator over an ordered price slice.
    ///
    /// An empty slice is an input error. A slice shorter than
    /// [`Indicator::min_periods`] yields an all-`None` output.
    fn calculate(&self, prices: &[f64]) -> Result<Self::Output>;
}

/// Reject empty input.
pub(crate) fn ensure_prices(prices: &[f64]) -> Result<()> {
    if prices.is_empty() {
        return Err(AppError::InvalidSeries(
            "cannot compute indicators over an empty price series".to_string(),
        ));
    }
    Ok(())
}
