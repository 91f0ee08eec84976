use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use snafu::{ResultExt, ensure};
use tracing::debug;

use crate::{
    models::{request_params::PageRequest, sample::Sample},
    providers::{
        ApiSnafu, ClientBuildSnafu, InvalidBaseUrlSnafu, InvalidUserAgentSnafu, PageSource,
        ProviderError, ProviderInitError, ReqwestSnafu,
        wiki_rest::{params::construct_params, response::TimeseriesResponse},
    },
};

pub const DEFAULT_BASE_URL: &str = "https://prices.runescape.wiki/api/v1/osrs";
pub const DEFAULT_USER_AGENT: &str = "Historical Analysis Bot - TalAslan";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the OSRS wiki real-time prices API.
///
/// The API rejects requests without a descriptive `User-Agent`, so one is
/// attached to every request as a default header.
pub struct WikiPricesProvider {
    client: Client,
    endpoint: String,
}

impl WikiPricesProvider {
    /// Creates a provider against the public API with the default user agent.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_options(DEFAULT_BASE_URL, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    /// Creates a provider against `base_url` (without the `/timeseries`
    /// suffix).
    pub fn with_options(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderInitError> {
        let base = base_url.trim().trim_end_matches('/');
        ensure!(
            !base.is_empty(),
            InvalidBaseUrlSnafu {
                message: "base URL is empty"
            }
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(user_agent)
                .context(InvalidUserAgentSnafu { user_agent })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            endpoint: format!("{base}/timeseries"),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PageSource for WikiPricesProvider {
    async fn fetch_page(
        &self,
        request: PageRequest,
    ) -> Result<Option<Vec<Sample>>, ProviderError> {
        let query_params = construct_params(&request);
        debug!(endpoint = %self.endpoint, ?query_params, "requesting timeseries page");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query_params)
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                status: status.as_u16(),
                message: error_msg,
            }
            .fail();
        }

        let body = response
            .json::<TimeseriesResponse>()
            .await
            .context(ReqwestSnafu)?;

        Ok(body.data)
    }
}
