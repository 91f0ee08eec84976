//! Cursor-paginated assembly of a bounded series.
//!
//! The prices API returns at most a few hundred buckets per call. To cover a
//! longer window, [`SeriesFetcher`] keeps asking for the page anchored at the
//! last timestamp it has seen until one of these happens:
//!
//! 1. it holds at least `target_count` samples,
//! 2. the API answers with an empty (or missing) page,
//! 3. a request fails, which is logged and ends the session with partial data,
//! 4. the cursor stops moving.
//!
//! A fetch never returns an error. Callers decide what an empty result means.

use std::{fmt, time::Duration};

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use tracing::{error, info, warn};

use crate::{
    models::{
        item::ItemId,
        request_params::PageRequest,
        series::{Series, SeriesBuilder},
        timestep::Timestep,
    },
    providers::{PageSource, ProviderError},
};

/// Courtesy spacing between two page requests.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Number of buckets covering `days` whole days at `timestep`.
pub fn target_count_for_days(timestep: Timestep, days: u32) -> usize {
    (timestep.buckets_per_day() * u64::from(days)) as usize
}

/// Why a fetch session ended.
#[derive(Debug)]
pub enum FetchStop {
    /// Enough samples were collected.
    TargetReached,
    /// The API returned an empty or missing page.
    Exhausted,
    /// The last page added no new samples or ended on its own cursor.
    Stalled { cursor: i64 },
    /// A page request failed; the samples gathered before it are kept.
    Failed(ProviderError),
}

impl FetchStop {
    pub fn is_degraded(&self) -> bool {
        matches!(self, FetchStop::Stalled { .. } | FetchStop::Failed(_))
    }
}

impl fmt::Display for FetchStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStop::TargetReached => f.write_str("target reached"),
            FetchStop::Exhausted => f.write_str("no more history"),
            FetchStop::Stalled { cursor } => write!(f, "cursor stalled at {cursor}"),
            FetchStop::Failed(e) => write!(f, "request failed: {e}"),
        }
    }
}

/// Result of one fetch session.
#[derive(Debug)]
pub struct FetchOutcome {
    pub series: Series,
    pub pages: usize,
    pub stop: FetchStop,
}

/// Pages through a [`PageSource`], one request at a time.
pub struct SeriesFetcher<S> {
    source: S,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl<S: PageSource> SeriesFetcher<S> {
    /// A fetcher spacing requests by [`DEFAULT_REQUEST_INTERVAL`].
    pub fn new(source: S) -> Self {
        Self::with_interval(source, DEFAULT_REQUEST_INTERVAL)
    }

    /// A fetcher spacing requests by `interval`. Zero disables pacing.
    pub fn with_interval(source: S, interval: Duration) -> Self {
        let limiter = Quota::with_period(interval)
            .map(|quota| RateLimiter::direct(quota.allow_burst(nonzero!(1u32))));
        Self { source, limiter }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Assembles up to roughly `target_count` samples, newest page first.
    ///
    /// The returned series may be shorter than requested (or empty) when the
    /// API runs out of history or a request fails; it is never longer than
    /// `target_count` plus one page.
    pub async fn fetch_bounded_series(
        &self,
        item_id: ItemId,
        timestep: Timestep,
        target_count: usize,
    ) -> Series {
        self.fetch(item_id, timestep, target_count).await.series
    }

    /// Like [`fetch_bounded_series`](Self::fetch_bounded_series), also
    /// reporting how the session ended.
    pub async fn fetch(
        &self,
        item_id: ItemId,
        timestep: Timestep,
        target_count: usize,
    ) -> FetchOutcome {
        let mut builder = SeriesBuilder::new(item_id, timestep);
        let mut request = PageRequest::latest(item_id, timestep);
        let mut pages = 0usize;

        let stop = loop {
            if builder.len() >= target_count {
                break FetchStop::TargetReached;
            }

            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            let page = match self.source.fetch_page(request.clone()).await {
                Ok(Some(page)) if !page.is_empty() => page,
                Ok(_) => break FetchStop::Exhausted,
                Err(e) => {
                    error!(
                        item = %item_id,
                        cursor = ?request.cursor,
                        collected = builder.len(),
                        "Error fetching timeseries data: {e}"
                    );
                    break FetchStop::Failed(e);
                }
            };

            pages += 1;
            // non-empty, checked above
            let last_ts = page[page.len() - 1].timestamp;
            let added = builder.push_page(page);

            if added == 0 || request.cursor == Some(last_ts) {
                warn!(
                    item = %item_id,
                    cursor = last_ts,
                    added,
                    "page brought no new samples, stopping"
                );
                break FetchStop::Stalled { cursor: last_ts };
            }
            request = request.at(last_ts);
        };

        let series = builder.finish();
        info!(
            item = %item_id,
            timestep = %timestep,
            pages,
            samples = series.len(),
            target = target_count,
            "fetch finished: {stop}"
        );

        FetchOutcome {
            series,
            pages,
            stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_year_of_five_minute_buckets() {
        assert_eq!(target_count_for_days(Timestep::FiveMinutes, 365), 105_120);
        assert_eq!(target_count_for_days(Timestep::OneDay, 30), 30);
    }

    #[test]
    fn zero_interval_disables_pacing() {
        struct Never;
        #[async_trait::async_trait]
        impl PageSource for Never {
            async fn fetch_page(
                &self,
                _request: PageRequest,
            ) -> Result<Option<Vec<crate::models::sample::Sample>>, ProviderError> {
                Ok(None)
            }
        }
        assert!(SeriesFetcher::with_interval(Never, Duration::ZERO).limiter.is_none());
        assert!(SeriesFetcher::new(Never).limiter.is_some());
    }

    #[test]
    fn degraded_stops() {
        assert!(!FetchStop::TargetReached.is_degraded());
        assert!(!FetchStop::Exhausted.is_degraded());
        assert!(FetchStop::Stalled { cursor: 0 }.is_degraded());
    }
}
