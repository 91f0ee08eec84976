#![allow(dead_code)]

use std::{collections::VecDeque, path::Path, sync::Mutex};

use async_trait::async_trait;
use market_analyzer::config::AnalyzerConfig;
use timeseries_ingestor::{
    models::{
        item::ItemId, request_params::PageRequest, sample::Sample, series::Series,
        timestep::Timestep,
    },
    providers::{PageSource, ProviderError},
};

pub type PageResult = Result<Option<Vec<Sample>>, ProviderError>;

/// Replays canned pages, then answers with empty ones.
pub struct CannedPages {
    pages: Mutex<VecDeque<PageResult>>,
}

impl CannedPages {
    pub fn new(pages: impl IntoIterator<Item = PageResult>) -> Self {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
        }
    }
}

#[async_trait]
impl PageSource for CannedPages {
    async fn fetch_page(&self, _request: PageRequest) -> PageResult {
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Some(vec![])))
    }
}

pub fn item() -> ItemId {
    ItemId::from_u32(565).unwrap()
}

pub fn sample(ts: i64, high: f64, low: f64, high_vol: u64, low_vol: u64) -> Sample {
    Sample {
        timestamp: ts,
        avg_high_price: Some(high),
        avg_low_price: Some(low),
        high_price_volume: Some(high_vol),
        low_price_volume: Some(low_vol),
    }
}

/// Three buckets whose statistics are easy to work out by hand.
pub fn worked_example() -> Vec<Sample> {
    vec![
        sample(0, 10.0, 9.0, 5, 1),
        sample(300, 12.0, 8.0, 7, 2),
        sample(600, 11.0, 8.0, 7, 3),
    ]
}

pub fn series(samples: Vec<Sample>) -> Series {
    Series::from_samples(item(), Timestep::FiveMinutes, samples)
}

/// A one-day config writing into `dir`.
pub fn config_in(dir: &Path) -> AnalyzerConfig {
    AnalyzerConfig {
        output_dir: dir.to_path_buf(),
        days: 1,
        ..AnalyzerConfig::default()
    }
}
