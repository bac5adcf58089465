//! AI provider abstraction.
//!
//! [`LlmProvider`] is an enum over concrete adapter implementations —
//! enum dispatch keeps the provider set closed and avoids `dyn` trait
//! objects. Adding a backend = new module in `providers/`, new
//! [`ProviderKind`] variant, new `complete` arm.
//!
//! Adapters are strictly translation layers: build the provider-specific
//! request, send it, extract the text. No retries, no streaming.

pub mod providers;

use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Non-2xx response, transport failure, or malformed response body.
    /// The message carries the HTTP status and provider error text.
    #[error("provider request failed: {0}")]
    Request(String),
}

// ── ProviderKind ──────────────────────────────────────────────────────────────

/// The closed set of supported providers. Parsed from the request string
/// before any network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    OpenRouter,
    /// Offline echo adapter, for tests and keyless smoke runs.
    Dummy,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Result<Self, ProviderError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "dummy" => Ok(ProviderKind::Dummy),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Dummy => "dummy",
        }
    }

    /// Cap on log characters embedded in the prompt. Gemini gets a smaller
    /// budget than the OpenAI-shaped providers.
    pub fn max_log_chars(&self) -> usize {
        match self {
            ProviderKind::Gemini => 50_000,
            _ => 80_000,
        }
    }

    /// Known model names, used by the providers listing endpoint.
    /// OpenRouter's namespace is open-ended — this is a starter set, any
    /// `org/model` string passes through.
    pub fn known_models(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAi => &["gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"],
            ProviderKind::Gemini => &["gemini-1.5-pro", "gemini-1.5-flash", "gemini-1.0-pro"],
            ProviderKind::OpenRouter => &[
                "openai/gpt-4-turbo",
                "anthropic/claude-3-opus",
                "anthropic/claude-3-sonnet",
                "mistralai/mistral-large",
                "meta-llama/llama-3-70b-instruct",
            ],
            ProviderKind::Dummy => &[],
        }
    }

    /// Providers advertised to clients. The dummy adapter stays reachable
    /// by name but is not listed.
    pub fn listed() -> &'static [ProviderKind] {
        &[
            ProviderKind::OpenAi,
            ProviderKind::Gemini,
            ProviderKind::OpenRouter,
        ]
    }

    /// Human-readable label for the UI.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenRouter => "OpenRouter",
            ProviderKind::Dummy => "Dummy",
        }
    }
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All adapter backends behind one `complete(prompt) -> text` surface.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    OpenAi(providers::openai_compatible::OpenAiCompatibleProvider),
    Gemini(providers::gemini::GeminiProvider),
    OpenRouter(providers::openrouter::OpenRouterProvider),
    Dummy(providers::dummy::DummyProvider),
}

impl LlmProvider {
    /// Send `prompt` to the provider and return its text answer.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            LlmProvider::OpenAi(p) => p.complete(prompt).await,
            LlmProvider::Gemini(p) => p.complete(prompt).await,
            LlmProvider::OpenRouter(p) => p.complete(prompt).await,
            LlmProvider::Dummy(p) => p.complete(prompt).await,
        }
    }

    /// Model name this adapter was constructed with.
    pub fn model(&self) -> &str {
        match self {
            LlmProvider::OpenAi(p) => p.model(),
            LlmProvider::Gemini(p) => p.model(),
            LlmProvider::OpenRouter(p) => p.model(),
            LlmProvider::Dummy(_) => "echo",
        }
    }
}
