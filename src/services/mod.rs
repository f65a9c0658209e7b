pub mod cache;
pub mod export;
pub mod market_data;
pub mod signal_service;
pub mod signals;

pub use cache::{Cache, TtlCache};
pub use market_data::CachedMarketData;
pub use signal_service::{CoinDetail, Dashboard, SignalService};
