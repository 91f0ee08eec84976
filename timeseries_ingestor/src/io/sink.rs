use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::{io::snapshot::write_json_snapshot, models::series::Series};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// A file-system operation failed.
    #[snafu(display("I/O error on {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// Converting the value to JSON failed.
    #[snafu(display("Failed to encode {}: {source}", path.display()))]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// A snapshot file did not hold the expected JSON shape.
    #[snafu(display("Failed to decode {}: {source}", path.display()))]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// This makes the trait flexible. For example:
    /// - A file sink might return `PathBuf`, the path of the created file.
    /// - A database sink might return `usize`, the number of rows inserted.
    type Output;

    /// Writes a finished series to the destination.
    async fn write(&self, data: &Series) -> Result<Self::Output, SinkError>;
}

/// Writes the raw samples of a series as an indented JSON array.
///
/// The file holds exactly what the API returned, in ascending timestamp
/// order, so it can be fed back through
/// [`read_json_snapshot`](crate::io::snapshot::read_json_snapshot).
#[derive(Debug, Clone)]
pub struct JsonSnapshotSink {
    path: PathBuf,
}

impl JsonSnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl DataSink for JsonSnapshotSink {
    type Output = PathBuf;

    /// Writes with blocking `std::fs` calls on the calling task. Snapshots
    /// are written once per run, after fetching, on a current-thread runtime.
    async fn write(&self, data: &Series) -> Result<PathBuf, SinkError> {
        write_json_snapshot(&self.path, data.samples())
    }
}
