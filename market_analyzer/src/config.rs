//! Analyzer configuration: defaults, TOML loading, environment overrides.
//!
//! Layers apply in this order, later ones winning:
//! 1. built-in defaults ([`AnalyzerConfig::default`])
//! 2. a TOML file ([`load_config_path`])
//! 3. environment ([`USER_AGENT_ENV`])
//! 4. command-line flags (see [`crate::cli::Cli`])
//!
//! File names inside `output_dir` are fixed.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};
use shared_utils::env::env_override;
use timeseries_ingestor::{
    fetcher::target_count_for_days,
    models::{item::ItemId, timestep::Timestep},
    providers::wiki_rest::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT},
};

/// Environment variable replacing the configured `User-Agent`.
pub const USER_AGENT_ENV: &str = "PRICE_HISTORY_USER_AGENT";

pub const RAW_DATA_FILE: &str = "raw_data.json";
pub const REPORT_FILE: &str = "analysis_report.json";
pub const CHART_FILE: &str = "price_analysis.svg";
pub const LOG_FILE: &str = "analysis.log";

/// Blood rune.
const DEFAULT_ITEM_ID: ItemId = match ItemId::from_u32(565) {
    Some(id) => id,
    None => panic!("item id must be non-zero"),
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    pub item_id: ItemId,
    /// Display name used in the chart title.
    pub item_name: String,
    pub timestep: Timestep,
    /// Length of the history window to fetch, in days.
    pub days: u32,
    pub api_base_url: String,
    pub user_agent: String,
    /// Minimum spacing between page requests.
    pub request_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub output_dir: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            item_id: DEFAULT_ITEM_ID,
            item_name: "Blood Rune".to_string(),
            timestep: Timestep::FiveMinutes,
            days: 365,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_interval_ms: 1_000,
            request_timeout_secs: 30,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl AnalyzerConfig {
    pub fn raw_data_path(&self) -> PathBuf {
        self.output_dir.join(RAW_DATA_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE)
    }

    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(CHART_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(LOG_FILE)
    }

    /// Number of samples that covers `days` at `timestep`.
    pub fn target_count(&self) -> usize {
        target_count_for_days(self.timestep, self.days)
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(env_override);
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(user_agent) = lookup(USER_AGENT_ENV) {
            self.user_agent = user_agent;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.days > 0, "days must be greater than zero");
        ensure!(
            self.request_interval_ms > 0,
            "request_interval_ms must be greater than zero"
        );
        ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be greater than zero"
        );
        ensure!(
            !self.api_base_url.trim().is_empty(),
            "api_base_url cannot be empty"
        );
        ensure!(
            !self.user_agent.trim().is_empty(),
            "user_agent cannot be empty"
        );
        Ok(())
    }
}

/// Parses and validates a configuration from TOML text.
///
/// Keys that are absent keep their default value.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<AnalyzerConfig> {
    let cfg: AnalyzerConfig = toml::from_str(toml_str).context("failed to parse config TOML")?;
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<AnalyzerConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
