//! HTTP API tests
//!
//! Drive the axum router in-process with an in-memory market data source.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use omen::config::Config;
use omen::sources::MarketDataSource;
use omen::{app, AppError, AppState, MarketSnapshot, PriceSeries, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

#[derive(Default)]
struct InMemorySource {
    failing_coin: Option<&'static str>,
    chart_calls: AtomicUsize,
}

#[async_trait]
impl MarketDataSource for InMemorySource {
    async fn market_chart(&self, coin_id: &str, days: u32, _vs: &str) -> Result<PriceSeries> {
        self.chart_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_coin == Some(coin_id) {
            return Err(AppError::ExternalApi("CoinGecko API error: 429 Too Many Requests".into()));
        }

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        PriceSeries::from_prices(
            (0..days as i64).map(|i| (start + Duration::days(i), 100.0 + (i as f64 * 0.3).sin() * 10.0)),
        )
    }

    async fn markets_snapshot(
        &self,
        coin_ids: &[String],
        _vs: &str,
    ) -> Result<HashMap<String, MarketSnapshot>> {
        Ok(coin_ids
            .iter()
            .map(|id| {
                let snapshot = if id == "solana" {
                    MarketSnapshot::default()
                } else {
                    MarketSnapshot {
                        market_cap: 3e9,
                        volume_24h: 1e8,
                    }
                };
                (id.clone(), snapshot)
            })
            .collect())
    }
}

fn router_with(source: Arc<InMemorySource>) -> axum::Router {
    app(AppState::new(Config::default(), source))
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(router_with(Arc::default()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_signals_serves_beginner_coins() {
    let (status, body) = get(router_with(Arc::default()), "/signals?days=120").await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r["coin_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["bitcoin", "ethereum", "solana", "binancecoin", "ripple"]);

    let btc = &records[0];
    assert_eq!(btc["symbol"], "BTC");
    assert!(["BUY", "HOLD", "SELL"].contains(&btc["signal"].as_str().unwrap()));
    assert!(btc["price_usd"].is_f64());
    assert!(btc["rsi14"].is_f64());
    assert_eq!(btc["risk"], "Low");
    assert_eq!(btc["market_cap"], 3e9);

    let sol = &records[2];
    assert!(sol["market_cap"].is_null());
    assert!(sol["volume_24h"].is_null());
    assert_eq!(sol["risk"], "Unknown");
}

#[tokio::test]
async fn test_signals_short_window_has_null_indicators() {
    let (status, body) = get(router_with(Arc::default()), "/signals?days=10").await;
    assert_eq!(status, StatusCode::OK);

    let btc = &body[0];
    assert!(btc["sma20"].is_null());
    assert!(btc["sma50"].is_null());
    assert!(btc["rsi14"].is_null());
    assert_eq!(btc["signal"], "HOLD");
}

#[tokio::test]
async fn test_signals_rejects_out_of_range_days() {
    for uri in ["/signals?days=0", "/signals?days=5000", "/signals/bitcoin?days=0"] {
        let (status, body) = get(router_with(Arc::default()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["status"], 400);
    }
}

#[tokio::test]
async fn test_signals_fails_whole_request_on_one_coin() {
    let source = Arc::new(InMemorySource {
        failing_coin: Some("ripple"),
        ..Default::default()
    });
    let (status, body) = get(router_with(source), "/signals").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("ripple failed:"), "{}", message);
    assert!(message.contains("429"));
}

#[tokio::test]
async fn test_coin_report() {
    let (status, body) = get(router_with(Arc::default()), "/signals/Ethereum?days=240").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["coin_id"], "ethereum");
    assert_eq!(body["symbol"], "ETH");
    assert!(body["macd"].is_f64());
    assert!(body["macd_signal"].is_f64());
    assert!(body.get("historical_example").is_some());
}

#[tokio::test]
async fn test_coin_report_unknown_coin() {
    let (status, body) = get(router_with(Arc::default()), "/signals/notacoin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_repeated_requests_hit_cache() {
    let source = Arc::new(InMemorySource::default());
    let router = router_with(source.clone());

    get(router.clone(), "/signals?days=120").await;
    get(router, "/signals?days=120").await;

    assert_eq!(source.chart_calls.load(Ordering::SeqCst), 5);
}
