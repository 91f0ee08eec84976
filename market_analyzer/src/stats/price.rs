use timeseries_ingestor::models::series::Series;

use crate::{
    report::PriceStatistics,
    stats::{
        StatsError, by_utc_day, ensure_non_empty, extremum, first_max, first_min, mean,
        sample_std,
    },
};

const METRIC: &str = "price statistics";

/// Per-day running extremes of the high price.
#[derive(Default)]
struct DayRange {
    bounds: Option<(f64, f64)>,
}

impl DayRange {
    fn observe(&mut self, price: f64) {
        self.bounds = Some(match self.bounds {
            None => (price, price),
            Some((lo, hi)) => (lo.min(price), hi.max(price)),
        });
    }

    fn width(&self) -> Option<f64> {
        self.bounds.map(|(lo, hi)| hi - lo)
    }
}

pub fn price_statistics(series: &Series) -> Result<PriceStatistics, StatsError> {
    ensure_non_empty(series)?;
    let samples = series.samples();

    let (high_value, high_ts) =
        first_max(samples, |s| s.avg_high_price).ok_or(StatsError::NoObservations {
            metric: METRIC,
            field: "avgHighPrice",
        })?;
    let (low_value, low_ts) =
        first_min(samples, |s| s.avg_low_price).ok_or(StatsError::NoObservations {
            metric: METRIC,
            field: "avgLowPrice",
        })?;

    let highs: Vec<f64> = samples.iter().filter_map(|s| s.avg_high_price).collect();
    // non-empty: first_max found a value
    let average_price = mean(&highs).unwrap_or_default();
    let price_volatility = sample_std(&highs).ok_or(StatsError::InsufficientData {
        metric: "price volatility",
        needed: 2,
        found: highs.len(),
    })?;

    let days = by_utc_day(samples, |day: &mut DayRange, s| {
        if let Some(price) = s.avg_high_price {
            day.observe(price);
        }
    })?;
    let widths: Vec<f64> = days.values().filter_map(DayRange::width).collect();
    let typical_daily_range = mean(&widths).unwrap_or_default();

    Ok(PriceStatistics {
        highest_price: extremum(high_value, high_ts)?,
        lowest_price: extremum(low_value, low_ts)?,
        average_price,
        price_volatility,
        typical_daily_range,
    })
}
