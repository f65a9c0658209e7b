//! Omen - rules-based cryptocurrency trading signals server and dashboard

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod tui;
pub mod types;

use axum::Router;
use config::Config;
use services::{CachedMarketData, SignalService};
use sources::MarketDataSource;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signals: Arc<SignalService>,
}

impl AppState {
    /// Wire a market data source behind the TTL cache and the signal service.
    pub fn new(config: Config, source: Arc<dyn MarketDataSource>) -> Self {
        let config = Arc::new(config);
        let market = Arc::new(CachedMarketData::new(source, config.cache_ttl));
        let signals = SignalService::new(config.clone(), market);
        Self { config, signals }
    }
}

/// Build the HTTP application with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::*;
