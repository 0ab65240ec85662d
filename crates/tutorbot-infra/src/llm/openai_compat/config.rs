//! Per-provider defaults for OpenAI-compatible endpoints.
//!
//! Each backend that speaks the OpenAI chat completions protocol gets a
//! factory returning an [`OpenAiCompatConfig`] with the right base URL.

use secrecy::SecretString;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "gemini").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Default model when a request leaves it empty.
    pub model: String,
}

/// OpenAI default configuration.
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_BASE_URL.into(),
        api_key: SecretString::from(api_key.to_string()),
        model: model.into(),
    }
}

/// Google Gemini default configuration (OpenAI-compatible endpoint).
pub fn gemini_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: GEMINI_BASE_URL.into(),
        api_key: SecretString::from(api_key.to_string()),
        model: model.into(),
    }
}

/// Any other OpenAI-compatible endpoint (local gateways, proxies).
pub fn custom(base_url: &str, api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai_compatible".into(),
        base_url: base_url.trim_end_matches('/').into(),
        api_key: SecretString::from(api_key.to_string()),
        model: model.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_gemini_defaults() {
        let config = gemini_defaults("g-key", "gemini-1.5-pro");
        assert_eq!(config.provider_name, "gemini");
        assert_eq!(config.base_url, GEMINI_BASE_URL);
        assert_eq!(config.api_key.expose_secret(), "g-key");
    }

    #[test]
    fn test_custom_trims_trailing_slash() {
        let config = custom("http://localhost:11434/v1/", "k", "llama3");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.provider_name, "openai_compatible");
    }
}
