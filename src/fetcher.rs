use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::plugins::traits::Fetcher;
use crate::utils::error::{AppError, Result};

/// Fetches source pages over HTTP with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Fetch {
                location: String::new(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        let fetch_error = |message: String| AppError::Fetch {
            location: location.to_string(),
            message,
        };

        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(format!("Failed to read body: {}", e)))?;

        tracing::debug!("Fetched {} bytes from {}", body.len(), location);
        Ok(body)
    }
}
