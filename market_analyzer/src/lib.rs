//! Price history analysis for a single item.
//!
//! Pulls a bounded series through [`timeseries_ingestor`], reduces it to a
//! [`report::Report`], and draws it as a three-panel chart. The
//! `market-analyzer` binary wires these together via [`pipeline::run`].

pub mod chart;
pub mod cli;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod stats;
