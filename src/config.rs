//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! when present (built-in defaults otherwise), then applies env overrides.
//! Secrets — the Azure DevOps PAT and provider API keys — come from env
//! only, never TOML:
//!
//! ```text
//! AZURE_DEVOPS_PAT        PAT for the Azure DevOps REST API
//! OPENAI_API_KEY          key for the OpenAI-compatible provider
//! OPENROUTER_API_KEY      key for OpenRouter
//! GEMINI_API_KEY          key for Gemini
//! BUILDSAGE_BIND          overrides [server].bind
//! BUILDSAGE_LOG_LEVEL     overrides [server].log_level
//! BUILDSAGE_PROVIDER      overrides [llm].default
//! ```

use std::env;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

const CONFIG_PATH: &str = "config/default.toml";

// ── Resolved config ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the HTTP surface binds to.
    pub bind: String,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct AzureConfig {
    /// REST api-version query parameter.
    pub api_version: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// OpenAI / OpenAI-compatible provider configuration (`[llm.openai]`).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

/// OpenRouter provider configuration (`[llm.openrouter]`).
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
    /// `HTTP-Referer` attribution header value.
    pub referer: String,
    /// `X-Title` attribution header value.
    pub title: String,
}

/// Gemini provider configuration (`[llm.gemini]`).
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API version root; the model path is appended per request.
    pub api_base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider used when a request names none. Maps to `default` in
    /// `[llm]` TOML.
    pub default_provider: String,
    pub openai: OpenAiConfig,
    pub openrouter: OpenRouterConfig,
    pub gemini: GeminiConfig,
}

/// Provider API keys, sourced from env only.
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub openai: Option<String>,
    pub openrouter: Option<String>,
    pub gemini: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub azure: AzureConfig,
    pub llm: LlmConfig,
    /// `AZURE_DEVOPS_PAT` — `None` means log retrieval will fail at
    /// request time with an auth error.
    pub azure_pat: Option<String>,
    pub keys: ProviderKeys,
}

impl Config {
    #[cfg(test)]
    pub fn default_for_tests() -> Self {
        let mut config = resolve(RawConfig::default());
        config.keys = ProviderKeys {
            openai: Some("test-key".into()),
            openrouter: Some("test-key".into()),
            gemini: Some("test-key".into()),
        };
        config
    }
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    azure: RawAzure,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Deserialize)]
struct RawServer {
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize)]
struct RawAzure {
    #[serde(default = "default_api_version")]
    api_version: String,
    #[serde(default = "default_azure_timeout")]
    timeout_seconds: u64,
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAi,
    #[serde(default)]
    openrouter: RawOpenRouter,
    #[serde(default)]
    gemini: RawGemini,
}

#[derive(Deserialize)]
struct RawOpenAi {
    #[serde(default = "default_openai_base")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_llm_timeout")]
    timeout_seconds: u64,
}

#[derive(Deserialize)]
struct RawOpenRouter {
    #[serde(default = "default_openrouter_base")]
    api_base_url: String,
    #[serde(default = "default_openrouter_model")]
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_llm_timeout")]
    timeout_seconds: u64,
    #[serde(default = "default_openrouter_referer")]
    referer: String,
    #[serde(default = "default_openrouter_title")]
    title: String,
}

#[derive(Deserialize)]
struct RawGemini {
    #[serde(default = "default_gemini_base")]
    api_base_url: String,
    #[serde(default = "default_gemini_model")]
    model: String,
    #[serde(default = "default_llm_timeout")]
    timeout_seconds: u64,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RawAzure {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            timeout_seconds: default_azure_timeout(),
        }
    }
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openai: RawOpenAi::default(),
            openrouter: RawOpenRouter::default(),
            gemini: RawGemini::default(),
        }
    }
}

impl Default for RawOpenAi {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_base(),
            model: default_openai_model(),
            temperature: default_temperature(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

impl Default for RawOpenRouter {
    fn default() -> Self {
        Self {
            api_base_url: default_openrouter_base(),
            model: default_openrouter_model(),
            temperature: default_temperature(),
            timeout_seconds: default_llm_timeout(),
            referer: default_openrouter_referer(),
            title: default_openrouter_title(),
        }
    }
}

impl Default for RawGemini {
    fn default() -> Self {
        Self {
            api_base_url: default_gemini_base(),
            model: default_gemini_model(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:7000".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_api_version() -> String {
    "7.1".to_string()
}
fn default_azure_timeout() -> u64 {
    30
}
fn default_provider() -> String {
    "openai".to_string()
}
fn default_openai_base() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_openai_model() -> String {
    "gpt-4o".to_string()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_llm_timeout() -> u64 {
    120
}
fn default_openrouter_base() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}
fn default_openrouter_model() -> String {
    "openai/gpt-4-turbo".to_string()
}
fn default_openrouter_referer() -> String {
    "https://buildsage.app".to_string()
}
fn default_openrouter_title() -> String {
    "Buildsage Log Analyzer".to_string()
}
fn default_gemini_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from `config/default.toml` (optional) plus env overrides.
pub fn load() -> Result<Config, AppError> {
    let raw = if Path::new(CONFIG_PATH).exists() {
        let text = std::fs::read_to_string(CONFIG_PATH)?;
        parse(&text)?
    } else {
        RawConfig::default()
    };

    let mut config = resolve(raw);
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML document into the raw shape. Split out for tests.
pub fn from_toml_str(text: &str) -> Result<Config, AppError> {
    Ok(resolve(parse(text)?))
}

fn parse(text: &str) -> Result<RawConfig, AppError> {
    toml::from_str(text).map_err(|e| AppError::Config(format!("invalid config TOML: {e}")))
}

fn resolve(raw: RawConfig) -> Config {
    Config {
        server: ServerConfig {
            bind: raw.server.bind,
            log_level: raw.server.log_level,
        },
        azure: AzureConfig {
            api_version: raw.azure.api_version,
            timeout_seconds: raw.azure.timeout_seconds,
        },
        llm: LlmConfig {
            default_provider: raw.llm.provider,
            openai: OpenAiConfig {
                api_base_url: raw.llm.openai.api_base_url,
                model: raw.llm.openai.model,
                temperature: raw.llm.openai.temperature,
                timeout_seconds: raw.llm.openai.timeout_seconds,
            },
            openrouter: OpenRouterConfig {
                api_base_url: raw.llm.openrouter.api_base_url,
                model: raw.llm.openrouter.model,
                temperature: raw.llm.openrouter.temperature,
                timeout_seconds: raw.llm.openrouter.timeout_seconds,
                referer: raw.llm.openrouter.referer,
                title: raw.llm.openrouter.title,
            },
            gemini: GeminiConfig {
                api_base_url: raw.llm.gemini.api_base_url,
                model: raw.llm.gemini.model,
                timeout_seconds: raw.llm.gemini.timeout_seconds,
            },
        },
        azure_pat: None,
        keys: ProviderKeys::default(),
    }
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(bind) = env::var("BUILDSAGE_BIND") {
        config.server.bind = bind;
    }
    if let Ok(level) = env::var("BUILDSAGE_LOG_LEVEL") {
        config.server.log_level = level;
    }
    if let Ok(provider) = env::var("BUILDSAGE_PROVIDER") {
        config.llm.default_provider = provider;
    }

    config.azure_pat = non_empty_env("AZURE_DEVOPS_PAT");
    config.keys = ProviderKeys {
        openai: non_empty_env("OPENAI_API_KEY"),
        openrouter: non_empty_env("OPENROUTER_API_KEY"),
        gemini: non_empty_env("GEMINI_API_KEY"),
    };
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_resolves_to_defaults() {
        let config = from_toml_str("").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:7000");
        assert_eq!(config.llm.default_provider, "openai");
        assert_eq!(config.llm.openai.model, "gpt-4o");
        assert_eq!(config.llm.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.azure.api_version, "7.1");
    }

    #[test]
    fn toml_values_override_defaults() {
        let config = from_toml_str(
            r#"
            [server]
            bind = "127.0.0.1:9999"

            [llm]
            default = "gemini"

            [llm.openai]
            api_base_url = "http://localhost:11434/v1/chat/completions"
            model = "llama3"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9999");
        assert_eq!(config.llm.default_provider, "gemini");
        assert_eq!(config.llm.openai.model, "llama3");
        // Untouched sections keep defaults.
        assert_eq!(config.llm.openrouter.model, "openai/gpt-4-turbo");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = from_toml_str("server = not-a-table").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn keys_default_to_none() {
        let config = from_toml_str("").unwrap();
        assert!(config.keys.openai.is_none());
        assert!(config.azure_pat.is_none());
    }
}
