//! HTTP client for the statistics API.

use crate::query::PlayerQuery;
use crate::traits::StatsApi;
use async_trait::async_trait;
use crstats_common::{CrStatsError, Result};
use crstats_config::ApiConfig;
use std::time::Duration;
use tracing::debug;

/// Statistics API client with connection pooling and a request timeout.
#[derive(Debug, Clone)]
pub struct HttpStatsApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatsApi {
    /// Creates a client for the configured endpoint.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_timeout(config.base_url.clone(), config.timeout())
    }

    /// Creates a client for `base_url` whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("crstats-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CrStatsError::network_with_source("Failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// The endpoint this client queries.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl StatsApi for HttpStatsApi {
    async fn fetch_player(&self, query: &PlayerQuery) -> Result<String> {
        let url = query.to_url(&self.base_url)?;
        debug!("Requesting player statistics: {}", url);

        let response = self.client.get(url).send().await.map_err(request_error)?;
        debug!("Statistics API answered with {}", response.status());

        response.text().await.map_err(request_error)
    }
}

fn request_error(err: reqwest::Error) -> CrStatsError {
    if err.is_timeout() {
        CrStatsError::network_with_source("Request timeout", err)
    } else if err.is_connect() {
        CrStatsError::network_with_source("Connection failed", err)
    } else if err.is_body() || err.is_decode() {
        CrStatsError::network_with_source("Failed to read response body", err)
    } else {
        CrStatsError::network_with_source("Network request failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_configured_endpoint() {
        let config = ApiConfig::default();
        let api = HttpStatsApi::new(&config).unwrap();
        assert_eq!(api.base_url(), config.base_url);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_network_error() {
        // Port 9 on localhost is the discard port; nothing should be listening.
        let api = HttpStatsApi::with_timeout("http://127.0.0.1:9/api.php", Duration::from_secs(2))
            .unwrap();

        let err = api.fetch_player(&PlayerQuery::new("Alice")).await.unwrap_err();
        assert!(matches!(err, CrStatsError::Network { .. }));
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_rejected_before_sending() {
        let api = HttpStatsApi::with_timeout("::not a url::", Duration::from_secs(1)).unwrap();

        let err = api.fetch_player(&PlayerQuery::new("Alice")).await.unwrap_err();
        assert!(matches!(err, CrStatsError::Config { .. }));
    }
}
