//! The analysis report artifact.
//!
//! Everything in here is a plain `f64`, `u64`, or `String`, so the report
//! serializes to JSON and back without losing a bit.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Layout of timestamps inside the report, always UTC.
pub const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders epoch seconds as a report timestamp.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn format_report_timestamp(epoch_secs: i64) -> Option<String> {
    DateTime::from_timestamp(epoch_secs, 0).map(|dt| dt.format(REPORT_TIME_FORMAT).to_string())
}

/// An extreme value together with the bucket it first occurred in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extremum<T> {
    pub value: T,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub highest_price: Extremum<f64>,
    pub lowest_price: Extremum<f64>,
    pub average_price: f64,
    /// Sample standard deviation of the high price.
    pub price_volatility: f64,
    /// Mean over UTC days of (max - min) high price within the day.
    pub typical_daily_range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeStatistics {
    pub average_daily_volume: f64,
    pub peak_volume: Extremum<u64>,
    pub total_volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingPatterns {
    /// Mean absolute bucket-to-bucket change of the high price.
    pub average_5min_movement: f64,
    pub positive_movements: u64,
    pub negative_movements: u64,
}

/// Summary statistics for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub price_statistics: PriceStatistics,
    pub volume_statistics: VolumeStatistics,
    pub trading_patterns: TradingPatterns,
}
