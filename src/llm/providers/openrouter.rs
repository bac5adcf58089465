//! OpenRouter adapter.
//!
//! Same wire dialect as `/chat/completions`, so this wraps
//! [`OpenAiCompatibleProvider`] with a different base URL, a mandatory
//! key, and OpenRouter's attribution headers (`HTTP-Referer`, `X-Title`).
//! Model names are open-ended `org/model` strings and pass through as-is.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::openai_compatible::OpenAiCompatibleProvider;
use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    inner: OpenAiCompatibleProvider,
}

impl OpenRouterProvider {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        timeout_seconds: u64,
        api_key: String,
        referer: String,
        title: String,
    ) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, "HTTP-Referer", &referer)?;
        insert_header(&mut headers, "X-Title", &title)?;

        let inner = OpenAiCompatibleProvider::with_headers(
            api_base_url,
            model,
            temperature,
            timeout_seconds,
            Some(api_key),
            headers,
        )?;
        Ok(Self { inner })
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.inner.complete(prompt).await
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), ProviderError> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ProviderError::Request(format!("invalid header name '{name}': {e}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| ProviderError::Request(format!("invalid header value for {name}: {e}")))?;
    headers.insert(name, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_arbitrary_org_model_names() {
        let p = OpenRouterProvider::new(
            "https://openrouter.ai/api/v1/chat/completions".into(),
            "some-org/some-experimental-model".into(),
            0.2,
            30,
            "key".into(),
            "https://example.test".into(),
            "Build Log Analyzer".into(),
        )
        .unwrap();
        assert_eq!(p.model(), "some-org/some-experimental-model");
    }

    #[test]
    fn rejects_unprintable_header_values() {
        let err = OpenRouterProvider::new(
            "https://openrouter.ai/api/v1/chat/completions".into(),
            "openai/gpt-4-turbo".into(),
            0.2,
            30,
            "key".into(),
            "bad\nreferer".into(),
            "title".into(),
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::Request(_)));
    }
}
