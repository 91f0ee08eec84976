//! Derivation of the [`Report`] from a finished series.
//!
//! Each statistic only looks at the samples where its input field is present;
//! a null high price drops a sample from the price aggregates but not from the
//! volume ones. Calendar days are UTC days.
//!
//! Unlike fetching, this stage never degrades: any aggregate that cannot be
//! computed fails the whole report.

pub mod patterns;
pub mod price;
pub mod volume;

use chrono::NaiveDate;
use indexmap::IndexMap;
use thiserror::Error;
use timeseries_ingestor::models::{sample::Sample, series::Series};
use tracing::{error, info};

use crate::report::{
    Extremum, PriceStatistics, Report, TradingPatterns, VolumeStatistics,
    format_report_timestamp,
};

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("cannot analyze an empty series")]
    EmptySeries,

    #[error("{metric}: no sample has a {field} value")]
    NoObservations {
        metric: &'static str,
        field: &'static str,
    },

    #[error("{metric}: needs at least {needed} observations, found {found}")]
    InsufficientData {
        metric: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("timestamp {0} cannot be represented as a UTC date")]
    InvalidTimestamp(i64),
}

/// Computes the price, volume, and pattern groups of a [`Report`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_report(&self, series: &Series) -> Result<Report, StatsError> {
        info!(samples = series.len(), "Generating complete analysis report");
        let report = (|| -> Result<Report, StatsError> {
            ensure_non_empty(series)?;
            Ok(Report {
                price_statistics: self.price_statistics(series)?,
                volume_statistics: self.volume_statistics(series)?,
                trading_patterns: self.trading_patterns(series)?,
            })
        })();
        log_failure("analysis report", report)
    }

    pub fn price_statistics(
        &self,
        series: &Series,
    ) -> Result<PriceStatistics, StatsError> {
        info!("Calculating price statistics");
        log_failure("price statistics", price::price_statistics(series))
    }

    pub fn volume_statistics(
        &self,
        series: &Series,
    ) -> Result<VolumeStatistics, StatsError> {
        info!("Calculating volume statistics");
        log_failure("volume statistics", volume::volume_statistics(series))
    }

    pub fn trading_patterns(
        &self,
        series: &Series,
    ) -> Result<TradingPatterns, StatsError> {
        info!("Analyzing trading patterns");
        log_failure("trading patterns", patterns::trading_patterns(series))
    }
}

fn log_failure<T>(stage: &str, result: Result<T, StatsError>) -> Result<T, StatsError> {
    if let Err(e) = &result {
        error!("Error calculating {stage}: {e}");
    }
    result
}

pub(crate) fn ensure_non_empty(series: &Series) -> Result<(), StatsError> {
    if series.is_empty() {
        Err(StatsError::EmptySeries)
    } else {
        Ok(())
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with the N-1 denominator.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// The largest `field` value and the sample it first appears in.
pub(crate) fn first_max<T, F>(samples: &[Sample], field: F) -> Option<(T, i64)>
where
    T: PartialOrd + Copy,
    F: Fn(&Sample) -> Option<T>,
{
    first_extreme(samples, field, |candidate, best| candidate > best)
}

/// The smallest `field` value and the sample it first appears in.
pub(crate) fn first_min<T, F>(samples: &[Sample], field: F) -> Option<(T, i64)>
where
    T: PartialOrd + Copy,
    F: Fn(&Sample) -> Option<T>,
{
    first_extreme(samples, field, |candidate, best| candidate < best)
}

fn first_extreme<T, F, B>(samples: &[Sample], field: F, beats: B) -> Option<(T, i64)>
where
    T: Copy,
    F: Fn(&Sample) -> Option<T>,
    B: Fn(T, T) -> bool,
{
    let mut best: Option<(T, i64)> = None;
    for s in samples {
        let Some(v) = field(s) else { continue };
        // strict comparison keeps the earliest of tied values
        if best.is_none_or(|(b, _)| beats(v, b)) {
            best = Some((v, s.timestamp));
        }
    }
    best
}

pub(crate) fn extremum<T>(value: T, timestamp: i64) -> Result<Extremum<T>, StatsError> {
    Ok(Extremum {
        value,
        timestamp: format_report_timestamp(timestamp)
            .ok_or(StatsError::InvalidTimestamp(timestamp))?,
    })
}

/// Folds samples into per-UTC-day accumulators, days in series order.
pub(crate) fn by_utc_day<A, F>(
    samples: &[Sample],
    mut fold: F,
) -> Result<IndexMap<NaiveDate, A>, StatsError>
where
    A: Default,
    F: FnMut(&mut A, &Sample),
{
    let mut days: IndexMap<NaiveDate, A> = IndexMap::new();
    for s in samples {
        let day = s.utc_date().ok_or(StatsError::InvalidTimestamp(s.timestamp))?;
        fold(days.entry(day).or_default(), s);
    }
    Ok(days)
}
