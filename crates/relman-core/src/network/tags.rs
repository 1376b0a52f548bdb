//! GitHub tag collaborator.
//!
//! Fetches the full tag list for a repository (paginated, followed until
//! a short page) and normalizes it for the editor: a leading `v` is
//! stripped, names that are not `major.minor.patch` versions are
//! dropped, and the result is sorted descending.

use crate::config::NetworkConfig;
use crate::error::{RelmanError, Result};
use crate::manifest::validate::is_semantic_version;
use crate::network::client::HttpClient;
use crate::network::retry::{retry_async, RetryConfig};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// One tag object from the GitHub tags API; only the name is used.
#[derive(Debug, Clone, Deserialize)]
pub struct TagInfo {
    pub name: String,
}

/// Client for the repository tags endpoint.
pub struct TagClient {
    http: Arc<HttpClient>,
    api_base: String,
}

impl TagClient {
    /// Create a tag client against the default API base.
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: Arc::new(HttpClient::new()?),
            api_base: NetworkConfig::GITHUB_API_BASE.to_string(),
        })
    }

    /// Create a tag client sharing an existing HTTP client.
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

    /// Fetch and normalize all version tags for `repo` (`owner/name`).
    pub async fn fetch_tags(&self, repo: &str) -> Result<Vec<String>> {
        let raw = self.fetch_raw_tags(repo).await?;
        let tags = normalize_tags(raw.into_iter().map(|t| t.name));
        info!("Fetched {} usable version tags for {}", tags.len(), repo);
        Ok(tags)
    }

    async fn fetch_raw_tags(&self, repo: &str) -> Result<Vec<TagInfo>> {
        let mut all_tags = Vec::new();
        let per_page = NetworkConfig::GITHUB_TAGS_PER_PAGE;

        for page in 1..=NetworkConfig::GITHUB_TAGS_MAX_PAGES {
            let url = format!(
                "{}/repos/{}/tags?per_page={}&page={}",
                self.api_base, repo, per_page, page
            );

            let retry_config = RetryConfig::new()
                .with_max_attempts(NetworkConfig::MAX_RETRIES)
                .with_base_delay(Duration::from_secs(2));

            let http = self.http.clone();
            let url_clone = url.clone();

            let (result, stats) = retry_async(
                &retry_config,
                || {
                    let http = http.clone();
                    let url = url_clone.clone();
                    async move {
                        let headers = vec![(
                            "Accept".to_string(),
                            "application/vnd.github.v3+json".to_string(),
                        )];
                        http.get_with_headers(&url, &headers).await
                    }
                },
                |e| e.is_retryable(),
            )
            .await;

            if stats.attempts > 1 {
                debug!("Tags request succeeded after {} attempts", stats.attempts);
            }

            let response = result?;
            let status = response.status();

            if status == StatusCode::FORBIDDEN {
                return Err(RelmanError::RateLimited {
                    service: "GitHub".to_string(),
                    retry_after_secs: None,
                });
            }

            if !status.is_success() {
                return Err(RelmanError::Fetch {
                    status: status.as_u16(),
                });
            }

            let tags: Vec<TagInfo> = response.json().await.map_err(|e| RelmanError::Json {
                message: format!("Failed to parse tag list: {}", e),
                source: None,
            })?;

            let count = tags.len();
            all_tags.extend(tags);

            // A short page means we've reached the end.
            if count < per_page as usize {
                break;
            }
        }

        Ok(all_tags)
    }
}

/// Normalize raw tag names for display.
///
/// Strips an optional leading `v`, drops names that are not plain
/// `major.minor.patch` versions, and sorts descending by lexicographic
/// string comparison. The string ordering is not numeric semver
/// ordering ("10.0.0" sorts before "9.0.0"); existing callers rely on
/// it, so it stays.
pub fn normalize_tags(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut tags: Vec<String> = names
        .into_iter()
        .map(|name| {
            name.strip_prefix('v')
                .map(str::to_string)
                .unwrap_or(name)
        })
        .filter(|name| is_semantic_version(name))
        .collect();
    tags.sort_by(|a, b| b.cmp(a));
    tags
}
