//! Analysis orchestrator.
//!
//! One sequential chain per request: parse URL → resolve provider → fetch
//! logs → build prompt → complete. The provider name is resolved before
//! any network call so an unknown provider never costs a fetch. No state
//! survives a request.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::azure::client::{AzureDevOpsClient, AzureError, LogBundle};
use crate::azure::url::{self, BuildReference};
use crate::config::{LlmConfig, ProviderKeys};
use crate::error::AppError;
use crate::llm::{ProviderKind, providers};

/// Question used when the request leaves `query` empty.
pub const DEFAULT_QUERY: &str = "What caused this build to fail and how can I fix it?";

// ── Request / result ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnalysisResult {
    pub answer: String,
    pub provider: String,
    pub model: String,
}

// ── Log source ────────────────────────────────────────────────────────────────

/// Where log content comes from. `Canned` serves fixed text for tests and
/// offline runs, mirroring the dummy provider on the LLM side.
#[derive(Debug, Clone)]
pub enum LogSource {
    Azure(AzureDevOpsClient),
    Canned(String),
}

impl LogSource {
    pub async fn fetch(&self, build: &BuildReference) -> Result<LogBundle, AzureError> {
        match self {
            LogSource::Azure(client) => {
                // Metadata first: a bad reference or credential fails here,
                // before any log content moves.
                let summary = client.get_build(build).await?;
                debug!(
                    status = ?summary.status,
                    result = ?summary.result,
                    build_number = ?summary.build_number,
                    "fetched build metadata"
                );
                client.get_build_logs(build).await
            }
            LogSource::Canned(content) => Ok(LogBundle {
                content: content.clone(),
                sections: 1,
            }),
        }
    }
}

// ── Analyzer ──────────────────────────────────────────────────────────────────

/// Immutable orchestrator shared across requests. Cloning is cheap; no
/// field is mutated after construction.
#[derive(Debug, Clone)]
pub struct Analyzer {
    logs: LogSource,
    llm: LlmConfig,
    keys: ProviderKeys,
    default_provider: ProviderKind,
}

impl Analyzer {
    pub fn new(
        logs: LogSource,
        llm: LlmConfig,
        keys: ProviderKeys,
        default_provider: ProviderKind,
    ) -> Self {
        Self {
            logs,
            llm,
            keys,
            default_provider,
        }
    }

    pub fn default_provider(&self) -> ProviderKind {
        self.default_provider
    }

    /// Run the full analyze chain for one request.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AppError> {
        if request.url.trim().is_empty() {
            return Err(AppError::Validation("url is required".into()));
        }

        let build = url::parse(&request.url)?;
        debug!(
            organization = %build.organization,
            project = %build.project,
            build_id = build.build_id,
            "parsed build reference"
        );

        let kind = match request.provider.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => ProviderKind::parse(name)?,
            _ => self.default_provider,
        };

        let logs = self.logs.fetch(&build).await?;
        info!(
            build_id = build.build_id,
            sections = logs.sections,
            bytes = logs.content.len(),
            "retrieved build logs"
        );

        let provider = providers::build(kind, &self.llm, &self.keys, request.model.as_deref())?;

        let query = match request.query.trim() {
            "" => DEFAULT_QUERY,
            q => q,
        };
        let prompt = build_prompt(&logs.content, query, kind.max_log_chars());

        let answer = provider.complete(&prompt).await?;
        info!(provider = kind.name(), model = provider.model(), "analysis complete");

        Ok(AnalysisResult {
            answer,
            provider: kind.name().to_string(),
            model: provider.model().to_string(),
        })
    }
}

/// Embed the query and (truncated) logs into the analysis prompt.
fn build_prompt(logs: &str, query: &str, max_log_chars: usize) -> String {
    let logs = truncate_chars(logs, max_log_chars);
    format!(
        "You are an expert in Azure DevOps build and release pipelines. \
         I'll provide you with build logs, and I need your help to understand what went wrong.\n\n\
         Please analyze these logs carefully and provide:\n\
         1. A clear explanation of what the error is\n\
         2. The most likely cause of the failure\n\
         3. Specific steps to fix the issue\n\n\
         Here's the specific question: {query}\n\n\
         Here are the logs:\n{logs}"
    )
}

/// Truncate on a char boundary so multi-byte log content never splits.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const BUILD_URL: &str = "https://dev.azure.com/acme/widgets/_build/results?buildId=42";

    fn analyzer(logs: &str) -> Analyzer {
        let config = Config::default_for_tests();
        Analyzer::new(
            LogSource::Canned(logs.into()),
            config.llm,
            config.keys,
            ProviderKind::Dummy,
        )
    }

    fn request(url: &str, query: &str, provider: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            url: url.into(),
            query: query.into(),
            provider: provider.map(String::from),
            model: None,
        }
    }

    #[tokio::test]
    async fn analyze_embeds_logs_and_query_in_prompt() {
        let a = analyzer("ERROR: disk full");
        let result = a
            .analyze(&request(BUILD_URL, "why failed?", Some("dummy")))
            .await
            .unwrap();
        assert!(result.answer.contains("ERROR: disk full"));
        assert!(result.answer.contains("why failed?"));
        assert_eq!(result.provider, "dummy");
        assert_eq!(result.model, "echo");
    }

    #[tokio::test]
    async fn empty_query_falls_back_to_default_question() {
        let a = analyzer("logs");
        let result = a.analyze(&request(BUILD_URL, "  ", None)).await.unwrap();
        assert!(result.answer.contains(DEFAULT_QUERY));
    }

    #[tokio::test]
    async fn empty_url_is_a_validation_error() {
        let a = analyzer("logs");
        let err = a.analyze(&request("  ", "q", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_url_is_a_parse_error() {
        let a = analyzer("logs");
        let err = a
            .analyze(&request("https://example.com/nope", "q", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[tokio::test]
    async fn unknown_provider_fails_before_any_fetch() {
        // A log source pointing at an unroutable address: if provider
        // resolution happened after the fetch, this would surface a
        // transient Azure error instead of UnknownProvider.
        let config = Config::default_for_tests();
        let client = AzureDevOpsClient::new("pat", "7.1", 1).unwrap();
        let a = Analyzer::new(
            LogSource::Azure(client),
            config.llm,
            config.keys,
            ProviderKind::Dummy,
        );
        let err = a
            .analyze(&request(BUILD_URL, "q", Some("nope")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Provider(crate::llm::ProviderError::UnknownProvider(_))
        ));
    }

    #[tokio::test]
    async fn repeated_requests_yield_identical_results() {
        let a = analyzer("ERROR: disk full");
        let req = request(BUILD_URL, "why failed?", Some("dummy"));
        let first = a.analyze(&req).await.unwrap();
        let second = a.analyze(&req).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn prompt_truncates_logs_on_char_boundary() {
        let logs = "é".repeat(100);
        let prompt = build_prompt(&logs, "q", 10);
        assert!(prompt.contains(&"é".repeat(10)));
        assert!(!prompt.contains(&"é".repeat(11)));
    }

    #[test]
    fn short_logs_are_not_truncated() {
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
