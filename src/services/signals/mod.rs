//! Trading signals service module.
//!
//! Provides technical indicator calculations, the threshold classifier,
//! risk tiers and the historical BUY-pattern search. Everything here is pure
//! and synchronous; callers own all I/O.

pub mod classifier;
pub mod history;
pub mod indicators;
pub mod risk;

pub use classifier::{classify, is_buy_setup};
pub use history::find_buy_example;
pub use risk::classify_risk;

use crate::error::{AppError, Result};
use crate::types::{AnnotatedSeries, PriceSeries, Snapshot};
use indicators::{Indicator, Macd, Rsi, Sma};

/// Annotate a price series with SMA20, SMA50, RSI14 and MACD(12, 26, 9).
///
/// Returns a new series; the input is only borrowed.
pub fn annotate(series: &PriceSeries) -> Result<AnnotatedSeries> {
    let prices = series.prices();

    let sma20 = Sma::new(20).calculate(&prices)?;
    let sma50 = Sma::new(50).calculate(&prices)?;
    let rsi14 = Rsi::default().calculate(&prices)?;
    let macd = Macd::default().calculate(&prices)?;

    Ok(AnnotatedSeries {
        bars: series.bars().to_vec(),
        sma20,
        sma50,
        rsi14,
        macd: macd.macd,
        macd_signal: macd.signal,
        macd_hist: macd.histogram,
    })
}

/// Run the full pipeline: annotate the series and classify its latest row.
pub fn compute_signals(series: &PriceSeries) -> Result<(AnnotatedSeries, Snapshot)> {
    let annotated = annotate(series)?;
    let latest = annotated
        .latest()
        .ok_or_else(|| AppError::InvalidSeries("series is empty".to_string()))?;
    let snapshot = classifier::snapshot(&latest);
    Ok((annotated, snapshot))
}
