//! Market-cap / liquidity risk tiers.

use crate::config::RiskThresholds;
use crate::types::RiskTier;

/// Classify risk from market cap and 24h volume.
///
/// A zero market cap means the data is unavailable. Small caps or thin
/// volume are High, mid caps Medium, everything else Low.
pub fn classify_risk(market_cap: f64, volume_24h: f64, thresholds: &RiskThresholds) -> RiskTier {
    if market_cap == 0.0 {
        return RiskTier::Unknown;
    }
    if market_cap < thresholds.high_risk_cap || volume_24h < thresholds.low_volume {
        return RiskTier::High;
    }
    if market_cap < thresholds.low_cap {
        return RiskTier::Medium;
    }
    RiskTier::Low
}
