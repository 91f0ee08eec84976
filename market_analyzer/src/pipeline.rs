//! The end-to-end analysis run.
//!
//! Fetching degrades (a partial series is still analyzed) while everything
//! after it is all-or-nothing: the first failed step aborts the run.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use timeseries_ingestor::{
    fetcher::SeriesFetcher,
    io::{
        sink::{DataSink, JsonSnapshotSink},
        snapshot::write_json_snapshot,
    },
    load_raw_snapshot,
    models::series::Series,
    providers::PageSource,
    wiki_fetcher,
};
use tracing::{info, warn};

use crate::{chart::PriceChart, config::AnalyzerConfig, report::Report, stats::StatisticsEngine};

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub raw_data: PathBuf,
    pub report_path: PathBuf,
    pub chart: PathBuf,
    pub report: Report,
}

/// Runs the whole analysis, fetching from the configured API unless
/// `raw_input` names a saved snapshot.
pub async fn run(config: &AnalyzerConfig, raw_input: Option<&Path>) -> anyhow::Result<Artifacts> {
    info!("Starting historical data analysis");

    let series = match raw_input {
        Some(path) => load_series(config, path)?,
        None => {
            let fetcher = wiki_fetcher(
                &config.api_base_url,
                &config.user_agent,
                config.request_timeout(),
                config.request_interval(),
            )
            .context("failed to set up the prices API client")?;
            fetch_series(config, &fetcher).await
        }
    };

    analyze_and_persist(config, &series).await
}

/// Same as [`run`], against any page source.
pub async fn run_with_fetcher<S: PageSource>(
    config: &AnalyzerConfig,
    fetcher: &SeriesFetcher<S>,
) -> anyhow::Result<Artifacts> {
    let series = fetch_series(config, fetcher).await;
    analyze_and_persist(config, &series).await
}

pub async fn fetch_series<S: PageSource>(
    config: &AnalyzerConfig,
    fetcher: &SeriesFetcher<S>,
) -> Series {
    info!(
        item = %config.item_id,
        timestep = %config.timestep,
        days = config.days,
        "Fetching historical data for item {}",
        config.item_id
    );
    let outcome = fetcher
        .fetch(config.item_id, config.timestep, config.target_count())
        .await;
    if outcome.stop.is_degraded() {
        warn!(
            samples = outcome.series.len(),
            "Fetch ended early ({}); continuing with partial data",
            outcome.stop
        );
    }
    outcome.series
}

pub fn load_series(config: &AnalyzerConfig, path: &Path) -> anyhow::Result<Series> {
    info!(path = %path.display(), "Loading raw data from snapshot");
    load_raw_snapshot(path, config.item_id, config.timestep)
        .with_context(|| format!("failed to load raw data from {}", path.display()))
}

/// Saves the raw series, derives and saves the report, and draws the chart.
pub async fn analyze_and_persist(
    config: &AnalyzerConfig,
    series: &Series,
) -> anyhow::Result<Artifacts> {
    if series.is_empty() {
        bail!("Failed to fetch data: no samples fetched for item {}", config.item_id);
    }

    info!(samples = series.len(), "Saving raw data");
    let raw_data = JsonSnapshotSink::new(config.raw_data_path())
        .write(series)
        .await
        .context("Failed to save raw data")?;

    info!("Generating analysis report");
    let report = StatisticsEngine::new()
        .generate_report(series)
        .context("Failed to generate analysis report")?;

    info!("Saving analysis report");
    let report_path = write_json_snapshot(config.report_path(), &report)
        .context("Failed to save analysis report")?;

    info!("Generating visualizations");
    let chart = PriceChart::for_item(&config.item_name)
        .render(series, config.chart_path())
        .context("Failed to render chart")?;

    info!("Analysis complete");
    info!("Raw data saved to: {}", raw_data.display());
    info!("Analysis report saved to: {}", report_path.display());
    info!("Chart saved to: {}", chart.display());

    Ok(Artifacts {
        raw_data,
        report_path,
        chart,
        report,
    })
}
