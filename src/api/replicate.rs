//! HTTP implementation of [`PredictionsApi`] for Replicate-style services.
//!
//! Jobs are created with `POST {base_url}` and polled with
//! `GET {base_url}/{id}`, authenticated by a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::api::client::PredictionsApi;
use crate::domain::{JobId, JobRecord};
use crate::error::{Result, RetouchError};

/// Default predictions endpoint
const REPLICATE_API_URL: &str = "https://api.replicate.com/v1/predictions";

/// Environment variable holding the API token
const TOKEN_ENV: &str = "REPLICATE_API_TOKEN";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Name of the environment variable the token is read from
    pub token_env: String,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            base_url: REPLICATE_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            token_env: TOKEN_ENV.to_string(),
        }
    }
}

/// Reqwest-backed predictions client.
pub struct ReplicateClient {
    client: Client,
    api_token: String,
    config: ReplicateConfig,
}

impl ReplicateClient {
    /// Create a client, reading the token from the configured environment
    /// variable.
    pub fn new(config: ReplicateConfig) -> Result<Self> {
        let api_token = std::env::var(&config.token_env)
            .map_err(|_| RetouchError::MissingApiToken(config.token_env.clone()))?;
        Self::with_api_token(api_token, config)
    }

    /// Create a client with an explicit token.
    pub fn with_api_token(api_token: String, config: ReplicateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RetouchError::Submission(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_token,
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn is_ready(&self) -> bool {
        !self.api_token.is_empty()
    }
}

#[async_trait]
impl PredictionsApi for ReplicateClient {
    async fn create_prediction(&self, body: Value) -> Result<JobRecord> {
        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.api_token)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RetouchError::Submission(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            // The service reports rejection reasons in a `detail` field
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v["detail"].as_str().map(str::to_string))
                .unwrap_or_else(|| "Failed to start image processing".to_string());
            log::warn!("Prediction create rejected with HTTP {}: {}", status, detail);
            return Err(RetouchError::Submission(detail));
        }

        response
            .json::<JobRecord>()
            .await
            .map_err(|e| RetouchError::Submission(format!("Invalid response: {}", e)))
    }

    async fn get_prediction(&self, id: &JobId) -> Result<JobRecord> {
        let url = format!("{}/{}", self.config.base_url, id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| RetouchError::Poll(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Status check for job {} failed with HTTP {}", id, status);
            return Err(RetouchError::Poll(format!(
                "Failed to check prediction status (HTTP {})",
                status
            )));
        }

        response
            .json::<JobRecord>()
            .await
            .map_err(|e| RetouchError::Poll(format!("Invalid response: {}", e)))
    }
}

impl std::fmt::Debug for ReplicateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ReplicateConfig::default();
        assert_eq!(config.base_url, REPLICATE_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.token_env, TOKEN_ENV);
    }

    #[test]
    fn test_client_with_explicit_token() {
        let client =
            ReplicateClient::with_api_token("test-token".to_string(), ReplicateConfig::default())
                .unwrap();
        assert!(client.is_ready());
        assert_eq!(client.base_url(), REPLICATE_API_URL);
    }

    #[test]
    fn test_empty_token_not_ready() {
        let client =
            ReplicateClient::with_api_token(String::new(), ReplicateConfig::default()).unwrap();
        assert!(!client.is_ready());
    }

    #[test]
    fn test_missing_env_token() {
        let config = ReplicateConfig {
            token_env: "RETOUCH_TEST_TOKEN_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let result = ReplicateClient::new(config);
        assert!(matches!(result, Err(RetouchError::MissingApiToken(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client =
            ReplicateClient::with_api_token("secret-token".to_string(), ReplicateConfig::default())
                .unwrap();
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("ReplicateClient"));
        assert!(!debug_str.contains("secret-token"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReplicateClient>();
    }
}
