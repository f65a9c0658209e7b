use crate::types::Coin;
use std::env;
use std::time::Duration;

/// Default coin universe (CoinGecko id, ticker symbol).
pub const DEFAULT_COINS: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("solana", "SOL"),
    ("binancecoin", "BNB"),
    ("ripple", "XRP"),
    ("cardano", "ADA"),
    ("dogecoin", "DOGE"),
    ("tron", "TRX"),
    ("polkadot", "DOT"),
    ("litecoin", "LTC"),
];

/// Market-cap and volume cut-offs used by the risk classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    /// Caps below this are at least Medium risk.
    pub low_cap: f64,
    /// Caps below this are High risk.
    pub high_risk_cap: f64,
    /// 24h volume below this is High risk.
    pub low_volume: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_cap: 2e9,
            high_risk_cap: 5e8,
            low_volume: 5e7,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// CoinGecko API key (optional, for pro tier).
    pub coingecko_api_key: Option<String>,
    /// Quote currency for all market data.
    pub vs_currency: String,
    /// Default history window in days.
    pub default_days: u32,
    /// How long fetched market data stays fresh.
    pub cache_ttl: Duration,
    /// Timeout for upstream HTTP requests.
    pub request_timeout: Duration,
    /// Full coin universe, in display order.
    pub coins: Vec<Coin>,
    /// Number of leading coins served to beginners and by the JSON API.
    pub beginner_coin_count: usize,
    /// Risk classifier thresholds.
    pub risk: RiskThresholds,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = RiskThresholds::default();

        // Format: "bitcoin|BTC,ethereum|ETH"
        let coins = env::var("COINS")
            .ok()
            .map(|s| parse_coins(&s))
            .filter(|coins| !coins.is_empty())
            .unwrap_or_else(default_coins);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT").unwrap_or(3002),
            coingecko_api_key: env::var("COINGECKO_API_KEY").ok().filter(|k| !k.is_empty()),
            vs_currency: env::var("VS_CURRENCY")
                .map(|v| v.to_lowercase())
                .unwrap_or_else(|_| "usd".to_string()),
            default_days: env_parse("DEFAULT_DAYS").unwrap_or(240),
            cache_ttl: Duration::from_secs(env_parse("CACHE_TTL_SECS").unwrap_or(60 * 60)),
            request_timeout: Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS").unwrap_or(30)),
            coins,
            beginner_coin_count: env_parse("BEGINNER_COIN_COUNT").unwrap_or(5),
            risk: RiskThresholds {
                low_cap: env_parse("RISK_LOW_CAP").unwrap_or(defaults.low_cap),
                high_risk_cap: env_parse("RISK_HIGH_RISK_CAP").unwrap_or(defaults.high_risk_cap),
                low_volume: env_parse("RISK_LOW_VOLUME").unwrap_or(defaults.low_volume),
            },
        }
    }

    /// Coins shown in beginner mode and served by the JSON API.
    pub fn beginner_coins(&self) -> &[Coin] {
        let n = self.beginner_coin_count.min(self.coins.len());
        &self.coins[..n]
    }

    /// Look up a configured coin by its CoinGecko id.
    pub fn coin(&self, coin_id: &str) -> Option<&Coin> {
        self.coins.iter().find(|c| c.id.eq_ignore_ascii_case(coin_id))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3002,
            coingecko_api_key: None,
            vs_currency: "usd".to_string(),
            default_days: 240,
            cache_ttl: Duration::from_secs(60 * 60),
            request_timeout: Duration::from_secs(30),
            coins: default_coins(),
            beginner_coin_count: 5,
            risk: RiskThresholds::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn default_coins() -> Vec<Coin> {
    DEFAULT_COINS
        .iter()
        .map(|(id, symbol)| Coin::new(id, symbol))
        .collect()
}

/// Parse a `id|SYMBOL,id|SYMBOL` coin list. Malformed entries are skipped.
pub fn parse_coins(raw: &str) -> Vec<Coin> {
    raw.split(',')
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split('|').map(str::trim).collect();
            if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
                Some(Coin::new(parts[0], parts[1]))
            } else {
                None
            }
        })
        .collect()
}
