use std::path::PathBuf;

use clap::Parser;
use timeseries_ingestor::models::{item::ItemId, timestep::Timestep};

use crate::config::{AnalyzerConfig, load_config_path};

#[derive(Debug, Parser)]
#[command(author, version, about = "Fetch, analyze, and chart an item's price history")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Item id on the prices API (e.g. 565 for blood runes)
    #[arg(long)]
    pub item_id: Option<ItemId>,

    /// Display name for the chart title
    #[arg(long)]
    pub item_name: Option<String>,

    /// Bucket width: 5m, 1h, 6h, or 24h
    #[arg(long)]
    pub timestep: Option<Timestep>,

    /// Days of history to fetch
    #[arg(long)]
    pub days: Option<u32>,

    /// Directory for the raw data, report, chart, and log
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Analyze a saved raw_data.json instead of calling the API
    #[arg(long, value_name = "FILE")]
    pub raw_input: Option<PathBuf>,
}

impl Cli {
    /// Builds the effective configuration: defaults, then the config file,
    /// then the environment, then these flags.
    pub fn resolve_config(&self) -> anyhow::Result<AnalyzerConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config_path(path)?,
            None => AnalyzerConfig::default(),
        };
        cfg.apply_env();
        self.apply_to(&mut cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Overwrites every field of `cfg` that was given on the command line.
    pub fn apply_to(&self, cfg: &mut AnalyzerConfig) {
        if let Some(id) = self.item_id {
            cfg.item_id = id;
        }
        if let Some(name) = &self.item_name {
            cfg.item_name = name.clone();
        }
        if let Some(timestep) = self.timestep {
            cfg.timestep = timestep;
        }
        if let Some(days) = self.days {
            cfg.days = days;
        }
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
    }
}
