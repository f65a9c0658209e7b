//! TTL-cached access to a market data source.

use crate::error::Result;
use crate::services::cache::{Cache, TtlCache};
use crate::sources::MarketDataSource;
use crate::types::{MarketSnapshot, PriceSeries};
use async_trait::async_trait;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cache key for a market chart request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartKey {
    pub coin_id: String,
    pub days: u32,
    pub vs: String,
}

/// Cache key for a markets snapshot request. Ids are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub coin_ids: Vec<String>,
    pub vs: String,
}

impl SnapshotKey {
    pub fn new(coin_ids: &[String], vs: &str) -> Self {
        let mut coin_ids = coin_ids.to_vec();
        coin_ids.sort();
        coin_ids.dedup();
        Self {
            coin_ids,
            vs: vs.to_string(),
        }
    }
}

pub type ChartCache = Arc<dyn Cache<ChartKey, PriceSeries>>;
pub type SnapshotCache = Arc<dyn Cache<SnapshotKey, HashMap<String, MarketSnapshot>>>;

/// Wraps a [`MarketDataSource`], answering repeated requests from cache.
///
/// Only successful responses are cached.
pub struct CachedMarketData {
    source: Arc<dyn MarketDataSource>,
    charts: ChartCache,
    snapshots: SnapshotCache,
}

impl CachedMarketData {
    /// Cache both request kinds in memory for `ttl`.
    pub fn new(source: Arc<dyn MarketDataSource>, ttl: Duration) -> Self {
        Self::with_caches(
            source,
            Arc::new(TtlCache::new(ttl)),
            Arc::new(TtlCache::new(ttl)),
        )
    }

    /// Use caller-provided cache implementations.
    pub fn with_caches(
        source: Arc<dyn MarketDataSource>,
        charts: ChartCache,
        snapshots: SnapshotCache,
    ) -> Self {
        Self {
            source,
            charts,
            snapshots,
        }
    }

    /// Fetch several charts concurrently. Results keep the order of `coin_ids`.
    pub async fn market_charts(
        &self,
        coin_ids: &[String],
        days: u32,
        vs: &str,
    ) -> Vec<Result<PriceSeries>> {
        join_all(coin_ids.iter().map(|id| self.market_chart(id, days, vs))).await
    }

    /// Forget everything cached so the next requests go upstream.
    pub fn clear(&self) {
        self.charts.clear();
        self.snapshots.clear();
        debug!("Market data cache cleared");
    }
}

#[async_trait]
impl MarketDataSource for CachedMarketData {
    async fn market_chart(&self, coin_id: &str, days: u32, vs: &str) -> Result<PriceSeries> {
        let key = ChartKey {
            coin_id: coin_id.to_string(),
            days,
            vs: vs.to_string(),
        };

        if let Some(series) = self.charts.get(&key) {
            debug!("Chart cache hit for {} ({} days, {})", coin_id, days, vs);
            return Ok(series);
        }

        let series = self.source.market_chart(coin_id, days, vs).await?;
        self.charts.insert(key, series.clone());
        Ok(series)
    }

    async fn markets_snapshot(
        &self,
        coin_ids: &[String],
        vs: &str,
    ) -> Result<HashMap<String, MarketSnapshot>> {
        let key = SnapshotKey::new(coin_ids, vs);

        if let Some(snapshot) = self.snapshots.get(&key) {
            debug!("Snapshot cache hit for {} coins", key.coin_ids.len());
            return Ok(snapshot);
        }

        let snapshot = self.source.markets_snapshot(&key.coin_ids, vs).await?;
        self.snapshots.insert(key, snapshot.clone());
        Ok(snapshot)
    }
}
