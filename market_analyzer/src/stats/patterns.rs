use timeseries_ingestor::models::series::Series;

use crate::{
    report::TradingPatterns,
    stats::{StatsError, ensure_non_empty, mean},
};

/// Differences between consecutive buckets that both carry a high price.
///
/// A null on either side of a pair drops that pair; it does not bridge the
/// gap to the next priced bucket.
pub fn high_price_diffs(series: &Series) -> Vec<f64> {
    series
        .samples()
        .windows(2)
        .filter_map(|pair| Some(pair[1].avg_high_price? - pair[0].avg_high_price?))
        .collect()
}

pub fn trading_patterns(series: &Series) -> Result<TradingPatterns, StatsError> {
    ensure_non_empty(series)?;

    let diffs = high_price_diffs(series);
    let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();

    Ok(TradingPatterns {
        // a flat or single-bucket series simply has no movement
        average_5min_movement: mean(&magnitudes).unwrap_or(0.0),
        positive_movements: diffs.iter().filter(|d| **d > 0.0).count() as u64,
        negative_movements: diffs.iter().filter(|d| **d < 0.0).count() as u64,
    })
}
