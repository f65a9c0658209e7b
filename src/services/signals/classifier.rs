//! Threshold rules that turn the latest indicator row into a signal.

use crate::types::{AnnotatedRow, Signal, Snapshot};

/// RSI below this is oversold.
pub const OVERSOLD: f64 = 30.0;
/// RSI above this is overbought.
pub const OVERBOUGHT: f64 = 70.0;

pub const BUY_REASON: &str =
    "RSI<30 (oversold) with price>SMA20 and SMA20>SMA50: oversold momentum inside a short-term uptrend";
pub const OVERBOUGHT_REASON: &str = "RSI>70 (overbought): momentum is stretched to the upside";
pub const BEARISH_CROSSOVER_REASON: &str =
    "Price<SMA20 with MACD below its signal line: bearish crossover under the short-term average";
pub const HOLD_REASON: &str =
    "Neutral: no strong oversold/uptrend or overbought/bearish signal";

fn lt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// The BUY pattern: oversold RSI while price and the short average sit in an uptrend.
///
/// Undefined inputs never match.
pub fn is_buy_setup(price: f64, sma20: Option<f64>, sma50: Option<f64>, rsi14: Option<f64>) -> bool {
    lt(rsi14, Some(OVERSOLD)) && gt(Some(price), sma20) && gt(sma20, sma50)
}

/// Evaluate the rules in precedence order: BUY, then SELL, then HOLD.
pub fn classify(row: &AnnotatedRow) -> (Signal, &'static str) {
    if is_buy_setup(row.price, row.sma20, row.sma50, row.rsi14) {
        return (Signal::Buy, BUY_REASON);
    }

    if gt(row.rsi14, Some(OVERBOUGHT)) {
        return (Signal::Sell, OVERBOUGHT_REASON);
    }

    if lt(Some(row.price), row.sma20) && lt(row.macd, row.macd_signal) {
        return (Signal::Sell, BEARISH_CROSSOVER_REASON);
    }

    (Signal::Hold, HOLD_REASON)
}

/// Classify a row and echo its indicator values.
pub fn snapshot(row: &AnnotatedRow) -> Snapshot {
    let (signal, reason) = classify(row);
    Snapshot {
        signal,
        reason: reason.to_string(),
        price: row.price,
        rsi14: row.rsi14,
        sma20: row.sma20,
        sma50: row.sma50,
        macd: row.macd,
        macd_signal: row.macd_signal,
        macd_hist: row.macd_hist,
    }
}
