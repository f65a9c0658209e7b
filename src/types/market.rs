use super::{HistoricalExample, RiskTier, Signal};
use serde::{Deserialize, Serialize};

/// A tracked coin: CoinGecko id plus display ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub symbol: String,
}

impl Coin {
    pub fn new(id: &str, symbol: &str) -> Self {
        Self {
            id: id.to_lowercase(),
            symbol: symbol.to_uppercase(),
        }
    }

    /// Label used in coin pickers, e.g. `BTC (bitcoin)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.symbol, self.id)
    }
}

/// Current market cap and 24h volume for one coin. Zero means unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub market_cap: f64,
    pub volume_24h: f64,
}

/// Per-coin record served by the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub symbol: String,
    pub coin_id: String,
    pub signal: Signal,
    pub reason: String,
    pub price_usd: f64,
    pub rsi14: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub risk: RiskTier,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
}

/// Detailed single-coin report: the record plus MACD state and the last BUY-like setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinReport {
    #[serde(flatten)]
    pub record: SignalRecord,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub historical_example: Option<HistoricalExample>,
}

/// One line of the dashboard signals table, also the export row format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardRow {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Coin ID")]
    pub coin_id: String,
    /// `BUY`, `HOLD`, `SELL` or `ERROR`.
    #[serde(rename = "Signal")]
    pub signal: String,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Price (USD)")]
    pub price: Option<f64>,
    #[serde(rename = "RSI(14)")]
    pub rsi14: Option<f64>,
    #[serde(rename = "SMA20")]
    pub sma20: Option<f64>,
    #[serde(rename = "SMA50")]
    pub sma50: Option<f64>,
    #[serde(rename = "Risk")]
    pub risk: RiskTier,
    #[serde(rename = "Mkt Cap ($)")]
    pub market_cap: Option<String>,
    #[serde(rename = "24h Vol ($)")]
    pub volume_24h: Option<String>,
    #[serde(rename = "Updated (UTC)")]
    pub updated: String,
}

pub const ERROR_SIGNAL: &str = "ERROR";

impl BoardRow {
    /// Sort key: BUY, HOLD, SELL, ERROR, then anything else.
    pub fn rank(&self) -> u8 {
        match self.signal.as_str() {
            "BUY" => Signal::Buy.rank(),
            "HOLD" => Signal::Hold.rank(),
            "SELL" => Signal::Sell.rank(),
            ERROR_SIGNAL => 3,
            _ => 9,
        }
    }

    pub fn is_error(&self) -> bool {
        self.signal == ERROR_SIGNAL
    }
}
