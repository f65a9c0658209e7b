use super::MarketDataSource;
use crate::error::{AppError, Result};
use crate::types::{Bar, MarketSnapshot, PriceSeries};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, warn};

const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
const COINGECKO_PRO_API_URL: &str = "https://pro-api.coingecko.com/api/v3";

/// Longest windows CoinGecko still serves at hourly granularity.
const HOURLY_MAX_DAYS: u32 = 30;

/// CoinGecko market chart response: `[[timestamp_ms, value], ...]` per field.
#[derive(Debug, Deserialize)]
pub(crate) struct CoinGeckoMarketChart {
    #[serde(default)]
    prices: Vec<(f64, Option<f64>)>,
    #[serde(default)]
    market_caps: Vec<(f64, Option<f64>)>,
    #[serde(default)]
    total_volumes: Vec<(f64, Option<f64>)>,
}

/// Subset of a `/coins/markets` entry.
#[derive(Debug, Deserialize)]
struct CoinGeckoMarket {
    id: String,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
}

#[derive(Default)]
struct JoinedRow {
    price: Option<f64>,
    market_cap: Option<f64>,
    volume: Option<f64>,
}

impl CoinGeckoMarketChart {
    /// Outer-join the three sub-series on timestamp and keep only complete rows.
    ///
    /// The result is ordered by timestamp with one row per timestamp; a
    /// repeated timestamp keeps its last value.
    pub(crate) fn into_series(self) -> Result<PriceSeries> {
        let mut rows: BTreeMap<i64, JoinedRow> = BTreeMap::new();

        for (ts, value) in self.prices {
            rows.entry(ts as i64).or_default().price = value;
        }
        for (ts, value) in self.market_caps {
            rows.entry(ts as i64).or_default().market_cap = value;
        }
        for (ts, value) in self.total_volumes {
            rows.entry(ts as i64).or_default().volume = value;
        }

        let total = rows.len();
        let bars: Vec<Bar> = rows
            .into_iter()
            .filter_map(|(ts, row)| {
                let timestamp = Utc.timestamp_millis_opt(ts).single()?;
                Some(Bar::new(timestamp, row.price?, row.market_cap?, row.volume?))
            })
            .collect();

        if bars.len() < total {
            debug!("Dropped {} incomplete market chart rows", total - bars.len());
        }

        PriceSeries::new(bars)
    }
}

/// CoinGecko REST client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl CoinGeckoClient {
    /// Create a new CoinGecko client.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Omen/0.1 (Crypto Signal Dashboard)")
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        let base_url = if api_key.is_some() {
            COINGECKO_PRO_API_URL
        } else {
            COINGECKO_API_URL
        };

        Self {
            client,
            api_key,
            base_url: base_url.to_string(),
        }
    }

    /// Point the client at a different API root (mirrors, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/json");

        if let Some(ref key) = self.api_key {
            request = request.header("x-cg-pro-api-key", key);
        }

        request
    }

    async fn send<T: for<'de> Deserialize<'de>>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("CoinGecko request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let excerpt: String = text.chars().take(200).collect();
            warn!("CoinGecko API returned {}: {}", status, excerpt);
            return Err(AppError::ExternalApi(format!("CoinGecko API error: {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse CoinGecko response: {}", e)))
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn market_chart(&self, coin_id: &str, days: u32, vs: &str) -> Result<PriceSeries> {
        let interval = if days <= HOURLY_MAX_DAYS { "hourly" } else { "daily" };
        debug!("Fetching CoinGecko market chart: {} days ({}) for {}", days, interval, coin_id);

        let days_param = days.to_string();
        let request = self.request(&format!("/coins/{}/market_chart", coin_id)).query(&[
            ("vs_currency", vs),
            ("days", days_param.as_str()),
            ("interval", interval),
        ]);

        let chart: CoinGeckoMarketChart = self.send(request).await?;
        chart.into_series()
    }

    async fn markets_snapshot(
        &self,
        coin_ids: &[String],
        vs: &str,
    ) -> Result<HashMap<String, MarketSnapshot>> {
        debug!("Fetching CoinGecko markets snapshot for {} coins", coin_ids.len());

        let ids = coin_ids.join(",");
        let request = self
            .request("/coins/markets")
            .query(&[("vs_currency", vs), ("ids", ids.as_str())]);

        let markets: Vec<CoinGeckoMarket> = self.send(request).await?;

        Ok(markets
            .into_iter()
            .map(|m| {
                (
                    m.id,
                    MarketSnapshot {
                        market_cap: m.market_cap.unwrap_or(0.0),
                        volume_24h: m.total_volume.unwrap_or(0.0),
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chart(value: serde_json::Value) -> CoinGeckoMarketChart {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_join_drops_incomplete_rows_and_sorts() {
        let raw = chart(json!({
            "prices": [[3000, 3.0], [1000, 1.0], [2000, 2.0]],
            "market_caps": [[1000, 10.0], [3000, 30.0], [2000, 20.0]],
            "total_volumes": [[1000, 100.0], [3000, 300.0]]
        }));
        let series = raw.into_series().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].timestamp.timestamp_millis(), 1000);
        assert_eq!(series.bars()[0].market_cap, 10.0);
        assert_eq!(series.bars()[1].price, 3.0);
        assert_eq!(series.bars()[1].volume, 300.0);
    }

    #[test]
    fn test_join_drops_null_values() {
        let raw = chart(json!({
            "prices": [[1000, 1.0], [2000, null]],
            "market_caps": [[1000, 10.0], [2000, 20.0]],
            "total_volumes": [[1000, 100.0], [2000, 200.0]]
        }));
        assert_eq!(raw.into_series().unwrap().len(), 1);
    }

    #[test]
    fn test_join_deduplicates_timestamps() {
        let raw = chart(json!({
            "prices": [[1000, 1.0], [1000, 1.5]],
            "market_caps": [[1000, 10.0]],
            "total_volumes": [[1000, 100.0]]
        }));
        let series = raw.into_series().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].price, 1.5);
    }

    #[test]
    fn test_join_empty_payload_is_invalid() {
        let raw = chart(json!({}));
        assert!(matches!(raw.into_series(), Err(AppError::InvalidSeries(_))));
    }

    #[tokio::test]
    async fn test_market_chart_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("days", "240"))
            .and(query_param("interval", "daily"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prices": [[1000, 1.0], [2000, 2.0]],
                "market_caps": [[1000, 10.0], [2000, 20.0]],
                "total_volumes": [[1000, 100.0], [2000, 200.0]]
            })))
            .mount(&server)
            .await;

        let client = CoinGeckoClient::new(None, Duration::from_secs(5)).with_base_url(server.uri());
        let series = client.market_chart("bitcoin", 240, "usd").await.unwrap();
        assert_eq!(series.prices(), vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_short_window_requests_hourly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/ethereum/market_chart"))
            .and(query_param("interval", "hourly"))
            .and(header("x-cg-pro-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prices": [[1000, 1.0]],
                "market_caps": [[1000, 10.0]],
                "total_volumes": [[1000, 100.0]]
            })))
            .mount(&server)
            .await;

        let client = CoinGeckoClient::new(Some("secret".to_string()), Duration::from_secs(5))
            .with_base_url(server.uri());
        let series = client.market_chart("ethereum", 30, "usd").await.unwrap();
        assert_eq!(series.len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_is_external_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = CoinGeckoClient::new(None, Duration::from_secs(5)).with_base_url(server.uri());
        let err = client.market_chart("bitcoin", 90, "usd").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }

    #[tokio::test]
    async fn test_markets_snapshot_nulls_become_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("ids", "bitcoin,ethereum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "bitcoin", "market_cap": 1.2e12, "total_volume": 3.4e10},
                {"id": "ethereum", "market_cap": null, "total_volume": null}
            ])))
            .mount(&server)
            .await;

        let client = CoinGeckoClient::new(None, Duration::from_secs(5)).with_base_url(server.uri());
        let ids = vec!["bitcoin".to_string(), "ethereum".to_string()];
        let snapshot = client.markets_snapshot(&ids, "usd").await.unwrap();
        assert_eq!(snapshot["bitcoin"].market_cap, 1.2e12);
        assert_eq!(snapshot["ethereum"], MarketSnapshot::default());
    }
}
