//! Provider abstraction for the time-series page source.
//!
//! This module defines the [`PageSource`] trait, the seam between the
//! pagination logic in [`crate::fetcher`] and whatever actually answers a page
//! request (the wiki prices REST API in production, a scripted source in
//! tests).
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn PageSource`).
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use timeseries_ingestor::models::{request_params::PageRequest, sample::Sample};
//! use timeseries_ingestor::providers::{PageSource, ProviderError};
//!
//! struct Silent;
//!
//! #[async_trait]
//! impl PageSource for Silent {
//!     async fn fetch_page(
//!         &self,
//!         _request: PageRequest,
//!     ) -> Result<Option<Vec<Sample>>, ProviderError> {
//!         Ok(None)
//!     }
//! }
//! ```

pub mod wiki_rest;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{request_params::PageRequest, sample::Sample};

/// Fetches one page of samples anchored at a cursor.
#[async_trait]
pub trait PageSource {
    /// Fetches the page described by `request`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(samples))` - The page body; may be an empty vector.
    /// * `Ok(None)` - The response carried no data array at all.
    /// * `Err(ProviderError)` - Transport, status, or decoding failure.
    async fn fetch_page(&self, request: PageRequest)
    -> Result<Option<Vec<Sample>>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// User agent contains characters not allowed in a header.
    #[snafu(display("Invalid user agent {user_agent:?}: {source}"))]
    InvalidUserAgent {
        user_agent: String,
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// Base URL is empty after trimming.
    #[snafu(display("Invalid base URL: {message}"))]
    InvalidBaseUrl {
        message: String,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `PageSource` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout, bad JSON).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The API answered with a non-success status.
    #[snafu(display("API error (HTTP {status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// An internal error occurred while processing data within the provider.
    #[snafu(display("Internal provider error: {message}"))]
    Internal {
        message: String,
        backtrace: Backtrace,
    },
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use async_trait::async_trait;

    use crate::models::{item::ItemId, timestep::Timestep};

    use super::*;

    struct LatestOnly;
    struct Exhausted;

    #[async_trait]
    impl PageSource for LatestOnly {
        async fn fetch_page(
            &self,
            request: PageRequest,
        ) -> Result<Option<Vec<Sample>>, ProviderError> {
            match request.cursor {
                None => Ok(Some(vec![Sample::empty(300)])),
                Some(_) => Ok(Some(vec![])),
            }
        }
    }

    #[async_trait]
    impl PageSource for Exhausted {
        async fn fetch_page(
            &self,
            _request: PageRequest,
        ) -> Result<Option<Vec<Sample>>, ProviderError> {
            Ok(None)
        }
    }

    // This function decides AT RUNTIME which source to give back.
    fn get_source(name: &str) -> Box<dyn PageSource + Send + Sync> {
        if name == "latest" {
            Box::new(LatestOnly)
        } else {
            Box::new(Exhausted)
        }
    }

    #[tokio::test]
    async fn test_dynamic_source() {
        let item = ItemId::new(NonZeroU32::new(565).unwrap());
        let request = PageRequest::latest(item, Timestep::FiveMinutes);

        let page = get_source("latest").fetch_page(request.clone()).await.unwrap();
        assert_eq!(page.map(|p| p.len()), Some(1));

        let later = get_source("latest").fetch_page(request.at(300)).await.unwrap();
        assert_eq!(later, Some(vec![]));

        let none = get_source("exhausted").fetch_page(request).await.unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn api_error_display_carries_status() {
        let err = ApiSnafu {
            status: 429u16,
            message: "slow down",
        }
        .build();
        assert_eq!(err.to_string(), "API error (HTTP 429): slow down");
    }
}
