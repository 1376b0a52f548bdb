//! Pull-request metadata collaborator.
//!
//! Fetches a single pull request and exposes its free-text body, which
//! the import flow scans for embedded artifact URLs.

use crate::config::NetworkConfig;
use crate::error::{RelmanError, Result};
use crate::network::client::HttpClient;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PullRequest {
    body: Option<String>,
}

/// Client for the pull-request endpoint.
pub struct PullClient {
    http: Arc<HttpClient>,
    api_base: String,
}

impl PullClient {
    /// Create a pull client against the default API base.
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: Arc::new(HttpClient::new()?),
            api_base: NetworkConfig::GITHUB_API_BASE.to_string(),
        })
    }

    /// Create a pull client sharing an existing HTTP client.
    pub fn with_http(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            api_base: NetworkConfig::GITHUB_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (for tests against a local server).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Fetch the body text of pull request `number` in `repo`
    /// (`owner/name`). Non-success statuses surface as
    /// [`RelmanError::Fetch`].
    pub async fn fetch_pull_body(&self, repo: &str, number: u64) -> Result<String> {
        let url = format!("{}/repos/{}/pulls/{}", self.api_base, repo, number);
        let headers = vec![(
            "Accept".to_string(),
            "application/vnd.github.v3+json".to_string(),
        )];

        let response = self.http.get_with_headers(&url, &headers).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelmanError::Fetch {
                status: status.as_u16(),
            });
        }

        let pull: PullRequest = response.json().await.map_err(|e| RelmanError::Json {
            message: format!("Failed to parse pull request: {}", e),
            source: None,
        })?;

        debug!("Fetched pull request {}#{}", repo, number);
        Ok(pull.body.unwrap_or_default())
    }
}
