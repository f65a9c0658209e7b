//! Retrospective search for the last BUY-like setup.

use super::classifier::is_buy_setup;
use super::indicators::{Indicator, Rsi, Sma};
use crate::error::Result;
use crate::types::{HistoricalExample, PriceSeries};
use chrono::Duration;

/// Forward-return horizons, in days.
pub const SHORT_HORIZON_DAYS: i64 = 7;
pub const LONG_HORIZON_DAYS: i64 = 30;

/// Find the most recent past bar matching the BUY pattern and measure what followed.
///
/// The latest bar is dropped before anything is computed, so a setup that is
/// only forming right now never counts as history. Forward returns look for
/// the first bar at or after the horizon within that same truncated series.
pub fn find_buy_example(series: &PriceSeries) -> Result<Option<HistoricalExample>> {
    let Some(history) = series.without_latest() else {
        return Ok(None);
    };

    let prices = history.prices();
    let sma20 = Sma::new(20).calculate(&prices)?;
    let sma50 = Sma::new(50).calculate(&prices)?;
    let rsi14 = Rsi::default().calculate(&prices)?;

    let Some(idx) =
        (0..prices.len()).rev().find(|&i| is_buy_setup(prices[i], sma20[i], sma50[i], rsi14[i]))
    else {
        return Ok(None);
    };

    let bars = history.bars();
    let signal_time = bars[idx].timestamp;
    let entry_price = bars[idx].price;

    let forward_return = |days: i64| -> Option<f64> {
        let target = signal_time + Duration::days(days);
        let future = bars[idx..].iter().find(|b| b.timestamp >= target)?;
        Some(round2((future.price / entry_price - 1.0) * 100.0))
    };

    Ok(Some(HistoricalExample {
        signal_time,
        entry_price,
        forward_return_7d: forward_return(SHORT_HORIZON_DAYS),
        forward_return_30d: forward_return(LONG_HORIZON_DAYS),
    }))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(i: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(i as i64)
    }

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_prices(prices.iter().enumerate().map(|(i, p)| (day(i), *p))).unwrap()
    }

    /// Flat at 200, one-bar crash to 100, then a slow 0.01/day grind up.
    ///
    /// The crash keeps RSI deeply oversold while the grind puts price above
    /// both averages once the pre-crash bars leave the 50-bar window (bar 64).
    fn crash_then_grind(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| match i {
                0..=14 => 200.0,
                15 => 100.0,
                _ => 100.0 + 0.01 * (i - 15) as f64,
            })
            .collect()
    }

    /// `crash_then_grind(71)` followed by a +50 jump that ends the setup.
    fn setup_then_rally(len: usize) -> Vec<f64> {
        let mut prices = crash_then_grind(71);
        let base = prices[70];
        for i in 71..len {
            prices.push(base + 50.0 + 0.01 * (i - 71) as f64);
        }
        prices
    }

    #[test]
    fn test_monotonic_series_has_no_example() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        assert_eq!(find_buy_example(&series(&prices)).unwrap(), None);
    }

    #[test]
    fn test_latest_bar_is_excluded() {
        // Bar 64 is the only match.
        let s = series(&crash_then_grind(65));
        assert_eq!(find_buy_example(&s).unwrap(), None);
    }

    #[test]
    fn test_single_bar_series_has_no_example() {
        assert_eq!(find_buy_example(&series(&[1.0])).unwrap(), None);
    }

    #[test]
    fn test_short_series_has_no_example() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        assert_eq!(find_buy_example(&series(&prices)).unwrap(), None);
    }

    #[test]
    fn test_most_recent_match_with_forward_returns() {
        let s = series(&setup_then_rally(111));
        let example = find_buy_example(&s).unwrap().expect("setup should be found");
        assert_eq!(example.signal_time, day(70));
        assert!((example.entry_price - 100.55).abs() < 1e-9);
        assert_eq!(example.forward_return_7d, Some(49.79));
        assert_eq!(example.forward_return_30d, Some(50.01));
    }

    #[test]
    fn test_horizon_beyond_series_is_none() {
        // Truncated history ends at bar 79: 7 days after bar 70 exists, 30 days does not.
        let s = series(&setup_then_rally(81));
        let example = find_buy_example(&s).unwrap().unwrap();
        assert_eq!(example.signal_time, day(70));
        assert!(example.forward_return_7d.is_some());
        assert_eq!(example.forward_return_30d, None);
    }

    #[test]
    fn test_forward_return_uses_first_bar_after_gap() {
        // Drop the bar exactly 7 days after the setup; the next one stands in.
        let prices = setup_then_rally(111);
        let bars: Vec<Bar> = prices
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 77)
            .map(|(i, p)| Bar::new(day(i), *p, 0.0, 0.0))
            .collect();
        let s = PriceSeries::new(bars).unwrap();
        let example = find_buy_example(&s).unwrap().unwrap();
        let expected = round2((prices[78] / prices[70] - 1.0) * 100.0);
        assert_eq!(example.forward_return_7d, Some(expected));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(-0.456), -0.46);
    }
}
