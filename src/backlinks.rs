//! Backlink API client
//!
//! Thin client for the DataForSEO live-backlinks endpoint. The response is
//! passed through to the caller unmodified; only transport and status
//! failures are surfaced as errors.

use crate::config::DataForSeoConfig;
use crate::error::Error as CrateError;
use reqwest::Client as ReqwestClient;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Default timeout for backlink requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com";

/// Error type for backlink lookups
#[derive(Debug, Error)]
pub enum BacklinksError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Response body
        message: String,
    },
}

impl From<BacklinksError> for CrateError {
    fn from(err: BacklinksError) -> Self {
        match err {
            BacklinksError::Http(e) => CrateError::Http(e),
            _ => CrateError::Backlinks(err.to_string()),
        }
    }
}

/// Client for the live-backlinks endpoint
#[derive(Clone)]
pub struct BacklinksClient {
    client: ReqwestClient,
    base_url: String,
    login: String,
    password: String,
    target: String,
}

#[cfg(test)]
impl BacklinksClient {
    /// Set the base URL (for testing only)
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }
}

impl BacklinksClient {
    /// Create a client from validated credentials
    pub fn new(config: &DataForSeoConfig) -> Self {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            login: config.login.clone(),
            password: config.password.clone(),
            target: config.target.clone(),
        }
    }

    /// Fetch live backlinks for the configured target
    #[instrument(skip(self))]
    pub async fn live_backlinks(&self) -> Result<Value, BacklinksError> {
        let url = format!("{}/v3/backlinks/backlinks/live", self.base_url);

        let body = json!([{
            "target": self.target,
            "limit": 100,
            "internal_list_limit": 10,
            "backlinks_status_type": "live",
            "include_subdomains": true,
            "exclude_internal_backlinks": true,
            "include_indirect_links": true,
            "mode": "one_per_domain"
        }]);

        debug!(target = %self.target, "fetching live backlinks");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.login, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BacklinksError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn test_client() -> BacklinksClient {
        BacklinksClient::new(&DataForSeoConfig {
            login: "login".to_string(),
            password: "password".to_string(),
            target: "https://example.com/".to_string(),
        })
    }

    #[tokio::test]
    async fn test_live_backlinks_passthrough() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("POST", "/v3/backlinks/backlinks/live")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{\"status_code\": 20000, \"tasks\": []}")
            .expect(1)
            .create_async()
            .await;

        let mut client = test_client();
        client.set_base_url(server.url());

        let response = client.live_backlinks().await.unwrap();
        assert_eq!(response["status_code"], 20000);

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_surfaced() {
        let mut server = Server::new_async().await;
        let _mock_server = server
            .mock("POST", "/v3/backlinks/backlinks/live")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let mut client = test_client();
        client.set_base_url(server.url());

        let result = client.live_backlinks().await;
        assert!(matches!(
            result,
            Err(BacklinksError::Api {
                status_code: 401,
                ..
            })
        ));
    }
}
