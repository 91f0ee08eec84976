use thiserror::Error;

use crate::{io::sink::SinkError, providers::ProviderInitError};

/// The unified error type for the `timeseries_ingestor` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A page source could not be constructed.
    #[error("Provider setup failed: {0}")]
    ProviderInit(#[from] ProviderInitError),

    /// An error originating from a snapshot read or write.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}
