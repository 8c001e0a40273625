use std::time::Duration;

use reqwest::Client;

use linkmill_core::config::FetchConfig;

use crate::IngestError;

/// Thin wrapper around a shared reqwest client carrying the configured
/// user agent and timeout.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, IngestError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// GET a page and return the body text. Non-2xx is an error.
    pub async fn get(&self, url: &str) -> Result<String, IngestError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(IngestError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
