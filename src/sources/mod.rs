//! Upstream market data providers.

pub mod coingecko;

pub use coingecko::CoinGeckoClient;

use crate::error::Result;
use crate::types::{MarketSnapshot, PriceSeries};
use async_trait::async_trait;
use std::collections::HashMap;

/// A provider of historical series and current market snapshots.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Time-ordered price / market cap / volume history for one coin.
    async fn market_chart(&self, coin_id: &str, days: u32, vs: &str) -> Result<PriceSeries>;

    /// Current market cap and 24h volume, keyed by coin id.
    ///
    /// Coins the provider does not know are simply absent.
    async fn markets_snapshot(
        &self,
        coin_ids: &[String],
        vs: &str,
    ) -> Result<HashMap<String, MarketSnapshot>>;
}
