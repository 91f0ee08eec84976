//! Fetching and persisting bucketed price history for a single item.
//!
//! The crate is split the same way the data flows:
//! - [`models`]: samples, series, timesteps, request parameters
//! - [`providers`]: the [`PageSource`](providers::PageSource) seam and the
//!   wiki prices REST implementation
//! - [`fetcher`]: cursor pagination into a bounded [`Series`](models::series::Series)
//! - [`io`]: JSON snapshot files

use std::{path::Path, time::Duration};

use errors::Error;
use fetcher::SeriesFetcher;
use models::{item::ItemId, sample::Sample, series::Series, timestep::Timestep};
use providers::wiki_rest::WikiPricesProvider;

pub mod errors;
pub mod fetcher;
pub mod io;
pub mod models;
pub mod providers;

/// Builds a fetcher over the wiki prices API.
pub fn wiki_fetcher(
    base_url: &str,
    user_agent: &str,
    timeout: Duration,
    request_interval: Duration,
) -> Result<SeriesFetcher<WikiPricesProvider>, Error> {
    let provider = WikiPricesProvider::with_options(base_url, user_agent, timeout)?;
    Ok(SeriesFetcher::with_interval(provider, request_interval))
}

/// Loads a raw snapshot back into a finished series.
///
/// Samples are re-sorted and de-duplicated, so hand-edited or concatenated
/// snapshots are accepted.
pub fn load_raw_snapshot(
    path: impl AsRef<Path>,
    item_id: ItemId,
    timestep: Timestep,
) -> Result<Series, Error> {
    let samples: Vec<Sample> = io::snapshot::read_json_snapshot(path)?;
    Ok(Series::from_samples(item_id, timestep, samples))
}
