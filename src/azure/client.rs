//! Azure DevOps REST client — build metadata and log retrieval.
//!
//! Authenticates with a PAT sent as `Authorization: Basic base64(":" + pat)`.
//! One [`LogBundle`] is assembled per request by concatenating every log
//! part of the build in log-sequence order. No retries here — the caller
//! decides what to do with a [`AzureError::Transient`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::url::BuildReference;

const SECTION_SEPARATOR: &str = "\n\n===== LOG SECTION =====\n\n";

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AzureError {
    /// 401/403 from Azure DevOps — bad or missing PAT. Carries the upstream code.
    #[error("azure devops authentication failed (HTTP {0})")]
    Auth(u16),

    #[error("not found: {0}")]
    NotFound(String),

    /// Network failure or 5xx — may succeed on a later attempt.
    #[error("azure devops request failed: {0}")]
    Transient(String),

    /// 2xx with a body we cannot make sense of.
    #[error("unexpected azure devops response: {0}")]
    Api(String),
}

// ── Data ──────────────────────────────────────────────────────────────────────

/// Concatenated log text for one build. Request-scoped, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBundle {
    pub content: String,
    /// Number of log parts that went into `content`.
    pub sections: usize,
}

/// Build status metadata, fetched before the logs.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSummary {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default, rename = "buildNumber")]
    pub build_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LogListing {
    #[serde(default)]
    value: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    id: u64,
}

// ── Client ────────────────────────────────────────────────────────────────────

/// PAT-authenticated client for the Azure DevOps build API.
///
/// Cheap to clone — `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct AzureDevOpsClient {
    client: Client,
    auth_header: String,
    api_version: String,
}

impl AzureDevOpsClient {
    pub fn new(
        pat: &str,
        api_version: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self, AzureError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AzureError::Transient(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            auth_header: format!("Basic {}", encode_pat(pat)),
            api_version: api_version.into(),
        })
    }

    /// Fetch status metadata for a build.
    pub async fn get_build(&self, build: &BuildReference) -> Result<BuildSummary, AzureError> {
        let url = format!(
            "{}/{}/_apis/build/builds/{}?api-version={}",
            build.api_base(),
            build.project,
            build.build_id,
            self.api_version
        );
        debug!(%url, "requesting build details");

        let response = self.get(&url).await?;
        let response = check_status(response, build).await?;

        response
            .json::<BuildSummary>()
            .await
            .map_err(|e| AzureError::Api(format!("failed to parse build details: {e}")))
    }

    /// Fetch every log part of a build and concatenate them in
    /// log-sequence order. Parts that fail to download are skipped with a
    /// warning; an entirely empty result is [`AzureError::NotFound`].
    pub async fn get_build_logs(&self, build: &BuildReference) -> Result<LogBundle, AzureError> {
        let logs_base = format!(
            "{}/{}/_apis/build/builds/{}/logs",
            build.api_base(),
            build.project,
            build.build_id
        );

        let listing_url = format!("{logs_base}?api-version={}", self.api_version);
        debug!(url = %listing_url, "requesting log listing");

        let response = self.get(&listing_url).await?;
        let response = check_status(response, build).await?;

        let mut listing = response
            .json::<LogListing>()
            .await
            .map_err(|e| AzureError::Api(format!("failed to parse log listing: {e}")))?;
        listing.value.sort_by_key(|entry| entry.id);

        let mut parts = Vec::with_capacity(listing.value.len());
        for entry in &listing.value {
            let log_url = format!("{logs_base}/{}?api-version={}", entry.id, self.api_version);
            match self.fetch_log_part(&log_url, build).await {
                Ok(text) => parts.push(text),
                Err(AzureError::Auth(code)) => return Err(AzureError::Auth(code)),
                Err(e) => {
                    warn!(log_id = entry.id, error = %e, "skipping unavailable log part");
                }
            }
        }

        if parts.is_empty() {
            return Err(AzureError::NotFound(format!(
                "no logs found for build {} in {}/{}",
                build.build_id, build.organization, build.project
            )));
        }

        debug!(sections = parts.len(), "assembled log bundle");
        Ok(LogBundle {
            sections: parts.len(),
            content: parts.join(SECTION_SEPARATOR),
        })
    }

    async fn fetch_log_part(
        &self,
        url: &str,
        build: &BuildReference,
    ) -> Result<String, AzureError> {
        let response = self.get(url).await?;
        let response = check_status(response, build).await?;
        response
            .text()
            .await
            .map_err(|e| AzureError::Api(format!("failed to read log body: {e}")))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, AzureError> {
        self.client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .send()
            .await
            .map_err(|e| AzureError::Transient(e.to_string()))
    }
}

/// Azure DevOps basic auth: empty username, PAT as password.
fn encode_pat(pat: &str) -> String {
    BASE64.encode(format!(":{pat}"))
}

/// Map a non-2xx response to the error taxonomy, consuming the body for
/// the message.
async fn check_status(
    response: reqwest::Response,
    build: &BuildReference,
) -> Result<reqwest::Response, AzureError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AzureError::Auth(status.as_u16())),
        StatusCode::NOT_FOUND => Err(AzureError::NotFound(format!(
            "build {} in {}/{}",
            build.build_id, build.organization, build.project
        ))),
        s if s.is_server_error() => {
            let body = response.text().await.unwrap_or_default();
            Err(AzureError::Transient(format!("HTTP {s}: {body}")))
        }
        s => {
            let body = response.text().await.unwrap_or_default();
            Err(AzureError::Api(format!("HTTP {s}: {body}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pat_is_basic_encoded_with_empty_username() {
        // base64(":secret")
        assert_eq!(encode_pat("secret"), "OnNlY3JldA==");
    }

    #[test]
    fn client_construction_succeeds() {
        let c = AzureDevOpsClient::new("pat", "7.1", 30).unwrap();
        assert!(c.auth_header.starts_with("Basic "));
    }
}
