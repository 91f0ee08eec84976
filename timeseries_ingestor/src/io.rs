//! Flat-file persistence for fetched series and derived artifacts.

pub mod sink;
pub mod snapshot;
