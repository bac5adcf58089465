//! Provider adapter implementations.
//!
//! [`build`] is the factory — called per request so a `provider`/`model`
//! pair in the request can select any configured backend. Adding a new
//! backend = new module + new match arm.

pub mod dummy;
pub mod gemini;
pub mod openai_compatible;
pub mod openrouter;

use crate::config::{LlmConfig, ProviderKeys};
use crate::llm::{LlmProvider, ProviderError, ProviderKind};

/// Construct an adapter for `kind` from config, API keys, and an optional
/// per-request model override.
///
/// API keys come from the environment only, never TOML. The
/// OpenAI-compatible adapter tolerates a missing key (keyless local
/// servers); Gemini and OpenRouter do not.
pub fn build(
    kind: ProviderKind,
    config: &LlmConfig,
    keys: &ProviderKeys,
    model_override: Option<&str>,
) -> Result<LlmProvider, ProviderError> {
    let model = |default: &str| {
        model_override
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    match kind {
        ProviderKind::OpenAi => {
            let c = &config.openai;
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                c.api_base_url.clone(),
                model(&c.model),
                c.temperature,
                c.timeout_seconds,
                keys.openai.clone(),
            )?;
            Ok(LlmProvider::OpenAi(p))
        }
        ProviderKind::Gemini => {
            let c = &config.gemini;
            let key = keys
                .gemini
                .clone()
                .ok_or_else(|| ProviderError::Request("GEMINI_API_KEY is not set".into()))?;
            let p = gemini::GeminiProvider::new(
                c.api_base_url.clone(),
                model(&c.model),
                c.timeout_seconds,
                key,
            )?;
            Ok(LlmProvider::Gemini(p))
        }
        ProviderKind::OpenRouter => {
            let c = &config.openrouter;
            let key = keys
                .openrouter
                .clone()
                .ok_or_else(|| ProviderError::Request("OPENROUTER_API_KEY is not set".into()))?;
            let p = openrouter::OpenRouterProvider::new(
                c.api_base_url.clone(),
                model(&c.model),
                c.temperature,
                c.timeout_seconds,
                key,
                c.referer.clone(),
                c.title.clone(),
            )?;
            Ok(LlmProvider::OpenRouter(p))
        }
        ProviderKind::Dummy => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_config() -> (LlmConfig, ProviderKeys) {
        let config = Config::default_for_tests();
        (config.llm, config.keys)
    }

    #[test]
    fn model_override_wins_over_config_default() {
        let (llm, mut keys) = test_config();
        keys.openai = Some("k".into());
        let p = build(ProviderKind::OpenAi, &llm, &keys, Some("gpt-4-turbo")).unwrap();
        assert_eq!(p.model(), "gpt-4-turbo");
    }

    #[test]
    fn blank_override_falls_back_to_config_default() {
        let (llm, keys) = test_config();
        let p = build(ProviderKind::OpenAi, &llm, &keys, Some("  ")).unwrap();
        assert_eq!(p.model(), llm.openai.model);
    }

    #[test]
    fn openrouter_requires_key() {
        let (llm, mut keys) = test_config();
        keys.openrouter = None;
        let err = build(ProviderKind::OpenRouter, &llm, &keys, None).unwrap_err();
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn gemini_requires_key() {
        let (llm, mut keys) = test_config();
        keys.gemini = None;
        let err = build(ProviderKind::Gemini, &llm, &keys, None).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn openai_tolerates_missing_key() {
        let (llm, mut keys) = test_config();
        keys.openai = None;
        assert!(build(ProviderKind::OpenAi, &llm, &keys, None).is_ok());
    }
}
