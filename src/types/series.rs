use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped market observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub market_cap: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, price: f64, market_cap: f64, volume: f64) -> Self {
        Self {
            timestamp,
            price,
            market_cap,
            volume,
        }
    }
}

/// A validated, time-ordered, non-empty sequence of bars.
///
/// Timestamps are strictly increasing, prices are finite and positive and
/// market cap / volume are finite and non-negative. The only way to build one
/// is through [`PriceSeries::new`], so every consumer can rely on these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validate and wrap a list of bars.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(AppError::InvalidSeries("series is empty".to_string()));
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.price.is_finite() || bar.price <= 0.0 {
                return Err(AppError::InvalidSeries(format!(
                    "bar {} has non-positive price {}",
                    i, bar.price
                )));
            }
            if !bar.market_cap.is_finite() || bar.market_cap < 0.0 {
                return Err(AppError::InvalidSeries(format!(
                    "bar {} has invalid market cap {}",
                    i, bar.market_cap
                )));
            }
            if !bar.volume.is_finite() || bar.volume < 0.0 {
                return Err(AppError::InvalidSeries(format!(
                    "bar {} has invalid volume {}",
                    i, bar.volume
                )));
            }
        }

        if let Some(i) = bars
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(AppError::InvalidSeries(format!(
                "timestamps not strictly increasing at bar {}",
                i + 1
            )));
        }

        Ok(Self { bars })
    }

    /// Build a series from `(timestamp, price)` pairs with zero cap and volume.
    pub fn from_prices<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        Self::new(
            points
                .into_iter()
                .map(|(ts, price)| Bar::new(ts, price, 0.0, 0.0))
                .collect(),
        )
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in bar order.
    pub fn prices(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.price).collect()
    }

    /// The most recent bar.
    pub fn latest(&self) -> &Bar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    /// Every bar except the most recent one, or `None` if that leaves nothing.
    pub fn without_latest(&self) -> Option<PriceSeries> {
        if self.bars.len() < 2 {
            return None;
        }
        Some(Self {
            bars: self.bars[..self.bars.len() - 1].to_vec(),
        })
    }
}

/// A price series with indicator columns aligned bar for bar.
///
/// Every column has exactly the series' length; `None` marks bars without
/// enough lookback for that indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedSeries {
    pub bars: Vec<Bar>,
    pub sma20: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    pub rsi14: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_hist: Vec<Option<f64>>,
}

/// One row of an [`AnnotatedSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnotatedRow {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub rsi14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
}

impl AnnotatedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Row at position `i`.
    pub fn row(&self, i: usize) -> Option<AnnotatedRow> {
        let bar = self.bars.get(i)?;
        Some(AnnotatedRow {
            timestamp: bar.timestamp,
            price: bar.price,
            sma20: self.sma20[i],
            sma50: self.sma50[i],
            rsi14: self.rsi14[i],
            macd: self.macd[i],
            macd_signal: self.macd_signal[i],
            macd_hist: self.macd_hist[i],
        })
    }

    /// The most recent row.
    pub fn latest(&self) -> Option<AnnotatedRow> {
        self.row(self.bars.len().checked_sub(1)?)
    }

    pub fn rows(&self) -> impl Iterator<Item = AnnotatedRow> + '_ {
        (0..self.bars.len()).filter_map(move |i| self.row(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    #[test]
    fn test_empty_series_rejected() {
        let err = PriceSeries::new(Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::InvalidSeries(_)));
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let bars = vec![Bar::new(ts(0), 1.0, 0.0, 0.0), Bar::new(ts(0), 2.0, 0.0, 0.0)];
        assert!(PriceSeries::new(bars).is_err());
    }

    #[test]
    fn test_decreasing_timestamp_rejected() {
        let bars = vec![Bar::new(ts(1), 1.0, 0.0, 0.0), Bar::new(ts(0), 2.0, 0.0, 0.0)];
        assert!(PriceSeries::new(bars).is_err());
    }

    #[test]
    fn test_non_positive_price_rejected() {
        assert!(PriceSeries::new(vec![Bar::new(ts(0), 0.0, 0.0, 0.0)]).is_err());
        assert!(PriceSeries::new(vec![Bar::new(ts(0), f64::NAN, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_negative_volume_rejected() {
        assert!(PriceSeries::new(vec![Bar::new(ts(0), 1.0, 0.0, -1.0)]).is_err());
    }

    #[test]
    fn test_without_latest() {
        let series = PriceSeries::from_prices((0..3).map(|i| (ts(i), 1.0 + i as f64))).unwrap();
        let head = series.without_latest().unwrap();
        assert_eq!(head.len(), 2);
        assert_eq!(head.latest().price, 2.0);
        assert_eq!(series.len(), 3);

        let single = PriceSeries::from_prices([(ts(0), 1.0)]).unwrap();
        assert!(single.without_latest().is_none());
    }
}
