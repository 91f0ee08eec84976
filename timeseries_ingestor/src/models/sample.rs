//! Canonical in-memory representation of one price/volume bucket.
//!
//! The field names on the wire are the API's camelCase names, so a raw
//! snapshot written from a [`Sample`] reads exactly like an API page.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single time bucket of averaged prices and trade counts.
///
/// Every observation is optional: the API reports `null` for a side of the
/// market that saw no trades in the bucket, and may omit the field entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Bucket start, seconds since the Unix epoch (UTC).
    pub timestamp: i64,

    /// Average price of trades at the high (instant-buy) side.
    #[serde(default)]
    pub avg_high_price: Option<f64>,

    /// Average price of trades at the low (instant-sell) side.
    #[serde(default)]
    pub avg_low_price: Option<f64>,

    /// Number of items traded at the high side.
    #[serde(default)]
    pub high_price_volume: Option<u64>,

    /// Number of items traded at the low side.
    #[serde(default)]
    pub low_price_volume: Option<u64>,
}

impl Sample {
    /// A bucket with only a timestamp; every observation null.
    pub fn empty(timestamp: i64) -> Self {
        Self {
            timestamp,
            avg_high_price: None,
            avg_low_price: None,
            high_price_volume: None,
            low_price_volume: None,
        }
    }

    /// The bucket start as a UTC instant, `None` if out of chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// UTC calendar day the bucket starts on.
    pub fn utc_date(&self) -> Option<NaiveDate> {
        self.datetime().map(|dt| dt.date_naive())
    }

    /// High plus low side volume; `None` unless both sides are reported
    /// and the sum fits in a `u64`.
    pub fn combined_volume(&self) -> Option<u64> {
        self.high_price_volume?.checked_add(self.low_price_volume?)
    }
}
