//! Signal API endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::types::{CoinReport, SignalRecord};
use crate::AppState;

/// Longest history window the API accepts.
pub const MAX_DAYS: u32 = 3650;

/// Query parameters for signals endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SignalsQuery {
    /// History window in days (1..=3650). Defaults to the configured window.
    pub days: Option<u32>,
    /// Quote currency. Defaults to the configured currency.
    pub vs: Option<String>,
}

impl SignalsQuery {
    fn resolve(&self, state: &AppState) -> Result<(u32, String)> {
        let days = self.days.unwrap_or(state.config.default_days);
        if !(1..=MAX_DAYS).contains(&days) {
            return Err(AppError::BadRequest(format!(
                "days must be between 1 and {}, got {}",
                MAX_DAYS, days
            )));
        }

        let vs = self
            .vs
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| state.config.vs_currency.clone());

        Ok((days, vs))
    }
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signals", get(get_signals))
        .route("/signals/:coin_id", get(get_coin_report))
}

/// Get signal records for the API coin universe.
async fn get_signals(
    State(state): State<AppState>,
    Query(query): Query<SignalsQuery>,
) -> Result<Json<Vec<SignalRecord>>> {
    let (days, vs) = query.resolve(&state)?;
    let coins = state.config.beginner_coins();

    let records = state.signals.api_records(coins, days, &vs).await?;
    Ok(Json(records))
}

/// Get the detailed report for one configured coin.
async fn get_coin_report(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
    Query(query): Query<SignalsQuery>,
) -> Result<Json<CoinReport>> {
    let (days, vs) = query.resolve(&state)?;
    let coin = state
        .config
        .coin(&coin_id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown coin: {}", coin_id)))?;

    let report = state.signals.coin_report(coin, days, &vs).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_query_parsing() {
        let query: SignalsQuery = serde_urlencoded::from_str("days=90&vs=EUR").unwrap();
        assert_eq!(query.days, Some(90));
        assert_eq!(query.vs.as_deref(), Some("EUR"));

        let empty: SignalsQuery = serde_urlencoded::from_str("").unwrap();
        assert!(empty.days.is_none());
        assert!(empty.vs.is_none());
    }

    #[test]
    fn test_signals_query_rejects_non_numeric_days() {
        assert!(serde_urlencoded::from_str::<SignalsQuery>("days=ten").is_err());
    }
}
