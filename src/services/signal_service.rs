//! Signal service: fetch, compute and shape results for the API and dashboard.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::market_data::CachedMarketData;
use crate::services::signals::{classify_risk, compute_signals, find_buy_example};
use crate::sources::MarketDataSource;
use crate::types::{
    AnnotatedSeries, BoardRow, Coin, CoinReport, HistoricalExample, MarketSnapshot, PriceSeries,
    RiskTier, SignalRecord, Snapshot, ERROR_SIGNAL,
};
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Everything the chart view needs for one coin.
#[derive(Debug, Clone)]
pub struct CoinDetail {
    pub coin: Coin,
    pub annotated: AnnotatedSeries,
    pub snapshot: Snapshot,
    pub example: Option<HistoricalExample>,
}

/// One dashboard refresh.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Sorted BUY, HOLD, SELL, ERROR, then by symbol.
    pub rows: Vec<BoardRow>,
    /// Successfully computed coins, keyed by coin id.
    pub details: HashMap<String, CoinDetail>,
    /// Set when the market snapshot could not be fetched.
    pub warning: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Computes signals for configured coins on top of cached market data.
pub struct SignalService {
    config: Arc<Config>,
    market: Arc<CachedMarketData>,
}

impl SignalService {
    /// Create a new signal service.
    pub fn new(config: Arc<Config>, market: Arc<CachedMarketData>) -> Arc<Self> {
        Arc::new(Self { config, market })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Drop cached market data so the next request refetches.
    pub fn clear_cache(&self) {
        self.market.clear();
    }

    /// Records for the JSON API. Any failing coin fails the whole call.
    pub async fn api_records(&self, coins: &[Coin], days: u32, vs: &str) -> Result<Vec<SignalRecord>> {
        let ids: Vec<String> = coins.iter().map(|c| c.id.clone()).collect();
        let snapshot = self.market.markets_snapshot(&ids, vs).await?;
        let snapshot = &snapshot;

        try_join_all(coins.iter().map(|coin| async move {
            let series = self.fetch(coin, days, vs).await?;
            let (_, latest) = compute_signals(&series).map_err(|e| AppError::coin_failed(&coin.id, e))?;
            Ok::<_, AppError>(self.record(coin, &latest, snapshot.get(&coin.id)))
        }))
        .await
    }

    /// Detailed report for one coin, including the last historical BUY setup.
    pub async fn coin_report(&self, coin: &Coin, days: u32, vs: &str) -> Result<CoinReport> {
        let snapshot = self
            .market
            .markets_snapshot(std::slice::from_ref(&coin.id), vs)
            .await?;
        let series = self.fetch(coin, days, vs).await?;

        let (_, latest) = compute_signals(&series).map_err(|e| AppError::coin_failed(&coin.id, e))?;
        let example = find_buy_example(&series).map_err(|e| AppError::coin_failed(&coin.id, e))?;

        Ok(CoinReport {
            record: self.record(coin, &latest, snapshot.get(&coin.id)),
            macd: latest.macd,
            macd_signal: latest.macd_signal,
            macd_hist: latest.macd_hist,
            historical_example: example,
        })
    }

    /// Build the dashboard board. Failures degrade to warnings and ERROR rows.
    pub async fn dashboard(&self, coins: &[Coin], days: u32, vs: &str) -> Dashboard {
        let generated_at = Utc::now();
        let ids: Vec<String> = coins.iter().map(|c| c.id.clone()).collect();

        let (snapshot, warning) = match self.market.markets_snapshot(&ids, vs).await {
            Ok(snapshot) => (snapshot, None),
            Err(e) => {
                warn!("Market snapshot unavailable: {}", e);
                (
                    HashMap::new(),
                    Some(format!("Market cap/volume unavailable: {}", e)),
                )
            }
        };

        let charts = self.market.market_charts(&ids, days, vs).await;
        let updated = generated_at.format("%Y-%m-%d %H:%M UTC").to_string();

        let mut rows = Vec::with_capacity(coins.len());
        let mut details = HashMap::new();

        for (coin, chart) in coins.iter().zip(charts) {
            match chart.and_then(|series| self.detail(coin, &series)) {
                Ok(detail) => {
                    rows.push(self.board_row(coin, &detail.snapshot, snapshot.get(&coin.id), &updated));
                    details.insert(coin.id.clone(), detail);
                }
                Err(e) => {
                    error!("Signal computation failed for {}: {}", coin.id, e);
                    rows.push(error_row(coin, &e, &updated));
                }
            }
        }

        rows.sort_by(|a, b| a.rank().cmp(&b.rank()).then_with(|| a.symbol.cmp(&b.symbol)));

        Dashboard {
            rows,
            details,
            warning,
            generated_at,
        }
    }

    async fn fetch(&self, coin: &Coin, days: u32, vs: &str) -> Result<PriceSeries> {
        debug!("Loading {} days of {} for {}", days, vs, coin.id);
        self.market
            .market_chart(&coin.id, days, vs)
            .await
            .map_err(|e| AppError::coin_failed(&coin.id, e))
    }

    fn detail(&self, coin: &Coin, series: &PriceSeries) -> Result<CoinDetail> {
        let (annotated, snapshot) = compute_signals(series)?;
        let example = find_buy_example(series)?;
        Ok(CoinDetail {
            coin: coin.clone(),
            annotated,
            snapshot,
            example,
        })
    }

    fn risk(&self, market: Option<&MarketSnapshot>) -> RiskTier {
        let market = market.copied().unwrap_or_default();
        classify_risk(market.market_cap, market.volume_24h, &self.config.risk)
    }

    fn record(&self, coin: &Coin, latest: &Snapshot, market: Option<&MarketSnapshot>) -> SignalRecord {
        SignalRecord {
            symbol: coin.symbol.clone(),
            coin_id: coin.id.clone(),
            signal: latest.signal,
            reason: latest.reason.clone(),
            price_usd: latest.price,
            rsi14: latest.rsi14,
            sma20: latest.sma20,
            sma50: latest.sma50,
            risk: self.risk(market),
            market_cap: market.map(|m| m.market_cap).filter(|v| *v != 0.0),
            volume_24h: market.map(|m| m.volume_24h).filter(|v| *v != 0.0),
        }
    }

    fn board_row(
        &self,
        coin: &Coin,
        latest: &Snapshot,
        market: Option<&MarketSnapshot>,
        updated: &str,
    ) -> BoardRow {
        BoardRow {
            symbol: coin.symbol.clone(),
            coin_id: coin.id.clone(),
            signal: latest.signal.as_str().to_string(),
            reason: latest.reason.clone(),
            price: Some(round_to(latest.price, 4)),
            rsi14: latest.rsi14.map(|v| round_to(v, 2)),
            sma20: latest.sma20.map(|v| round_to(v, 2)),
            sma50: latest.sma50.map(|v| round_to(v, 2)),
            risk: self.risk(market),
            market_cap: market.map(|m| m.market_cap).filter(|v| *v != 0.0).map(format_thousands),
            volume_24h: market.map(|m| m.volume_24h).filter(|v| *v != 0.0).map(format_thousands),
            updated: updated.to_string(),
        }
    }
}

fn error_row(coin: &Coin, cause: &AppError, updated: &str) -> BoardRow {
    BoardRow {
        symbol: coin.symbol.clone(),
        coin_id: coin.id.clone(),
        signal: ERROR_SIGNAL.to_string(),
        reason: cause.to_string(),
        price: None,
        rsi14: None,
        sma20: None,
        sma50: None,
        risk: RiskTier::Unknown,
        market_cap: None,
        volume_24h: None,
        updated: updated.to_string(),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Whole number with comma thousands separators, e.g. `1,234,568`.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", out)
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Signal;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::time::Duration as StdDuration;

    struct FakeSource {
        snapshot_fails: bool,
    }

    fn rising(len: usize) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        PriceSeries::from_prices((0..len).map(|i| (start + Duration::days(i as i64), 100.0 + i as f64)))
            .unwrap()
    }

    #[async_trait]
    impl MarketDataSource for FakeSource {
        async fn market_chart(&self, coin_id: &str, days: u32, _vs: &str) -> Result<PriceSeries> {
            match coin_id {
                "broken" => Err(AppError::ExternalApi("CoinGecko API error: 429".to_string())),
                _ => Ok(rising(days as usize)),
            }
        }

        async fn markets_snapshot(
            &self,
            coin_ids: &[String],
            _vs: &str,
        ) -> Result<HashMap<String, MarketSnapshot>> {
            if self.snapshot_fails {
                return Err(AppError::ExternalApi("snapshot down".to_string()));
            }
            Ok(coin_ids
                .iter()
                .filter(|id| id.as_str() != "zeroes")
                .map(|id| {
                    (
                        id.clone(),
                        MarketSnapshot {
                            market_cap: 3e9,
                            volume_24h: 1_234_567.8,
                        },
                    )
                })
                .collect())
        }
    }

    fn service(snapshot_fails: bool) -> Arc<SignalService> {
        let market = CachedMarketData::new(
            Arc::new(FakeSource { snapshot_fails }),
            StdDuration::from_secs(60),
        );
        SignalService::new(Arc::new(Config::default()), Arc::new(market))
    }

    fn coins(ids: &[(&str, &str)]) -> Vec<Coin> {
        ids.iter().map(|(id, sym)| Coin::new(id, sym)).collect()
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1_234_567.8), "1,234,568");
        assert_eq!(format_thousands(-12_345.0), "-12,345");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(66.666_666, 2), 66.67);
    }

    #[tokio::test]
    async fn test_api_records_shape() {
        let svc = service(false);
        let records = svc
            .api_records(&coins(&[("bitcoin", "BTC"), ("zeroes", "ZRO")]), 60, "usd")
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].coin_id, "bitcoin");
        assert_eq!(records[0].signal, Signal::Sell);
        assert_eq!(records[0].price_usd, 159.0);
        assert_eq!(records[0].market_cap, Some(3e9));
        assert_eq!(records[1].market_cap, None);
        assert_eq!(records[1].risk, RiskTier::Unknown);
    }

    #[tokio::test]
    async fn test_api_records_fail_on_any_coin() {
        let svc = service(false);
        let err = svc
            .api_records(&coins(&[("bitcoin", "BTC"), ("broken", "BRK")]), 60, "usd")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("broken failed:"));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_coin_report_includes_macd() {
        let svc = service(false);
        let report = svc.coin_report(&Coin::new("bitcoin", "BTC"), 60, "usd").await.unwrap();
        assert_eq!(report.record.symbol, "BTC");
        assert!(report.macd.is_some());
        assert!(report.macd_signal.is_some());
        assert!(report.historical_example.is_none());
    }

    #[tokio::test]
    async fn test_dashboard_degrades_snapshot_and_sorts_errors_last() {
        let svc = service(true);
        let board = svc
            .dashboard(
                &coins(&[("broken", "BRK"), ("ethereum", "ETH"), ("bitcoin", "BTC")]),
                60,
                "usd",
            )
            .await;

        assert!(board.warning.is_some());
        let symbols: Vec<&str> = board.rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH", "BRK"]);

        let broken = &board.rows[2];
        assert!(broken.is_error());
        assert_eq!(broken.risk, RiskTier::Unknown);
        assert!(broken.reason.contains("429"));

        assert!(board.rows[0].market_cap.is_none());
        assert_eq!(board.details.len(), 2);
        assert!(!board.details.contains_key("broken"));
    }

    #[tokio::test]
    async fn test_dashboard_rows_are_rounded_and_formatted() {
        let svc = service(false);
        let board = svc.dashboard(&coins(&[("bitcoin", "BTC")]), 60, "usd").await;

        let row = &board.rows[0];
        assert_eq!(row.signal, "SELL");
        assert_eq!(row.price, Some(159.0));
        assert_eq!(row.rsi14, Some(100.0));
        assert_eq!(row.market_cap.as_deref(), Some("3,000,000,000"));
        assert_eq!(row.volume_24h.as_deref(), Some("1,234,568"));
        assert_eq!(row.risk, RiskTier::High);
        assert!(row.updated.ends_with(" UTC"));
    }
}
