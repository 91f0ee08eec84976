use timeseries_ingestor::models::series::Series;

use crate::{
    report::VolumeStatistics,
    stats::{StatsError, by_utc_day, ensure_non_empty, extremum, first_max},
};

/// Volume statistics over the high-side trade counts.
///
/// A null count contributes zero to the sums, and every UTC day present in
/// the series counts toward the daily average, even one with no trades.
pub fn volume_statistics(series: &Series) -> Result<VolumeStatistics, StatsError> {
    ensure_non_empty(series)?;
    let samples = series.samples();

    let total_volume = samples
        .iter()
        .filter_map(|s| s.high_price_volume)
        .fold(0u64, u64::saturating_add);

    let days = by_utc_day(samples, |total: &mut u64, s| {
        *total = total.saturating_add(s.high_price_volume.unwrap_or(0));
    })?;
    let average_daily_volume =
        days.values().map(|&v| v as f64).sum::<f64>() / days.len() as f64;

    let (peak, peak_ts) =
        first_max(samples, |s| s.high_price_volume).ok_or(StatsError::NoObservations {
            metric: "volume statistics",
            field: "highPriceVolume",
        })?;

    Ok(VolumeStatistics {
        average_daily_volume,
        peak_volume: extremum(peak, peak_ts)?,
        total_volume,
    })
}
