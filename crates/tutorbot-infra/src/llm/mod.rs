//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](tutorbot_core::llm::provider::LlmProvider)
//! used in production and a factory ([`create_provider`]) that picks the
//! backend named in the configuration.

pub mod openai_compat;

use secrecy::{ExposeSecret, SecretString};

use tutorbot_core::llm::box_provider::BoxLlmProvider;
use tutorbot_types::config::TutorConfig;
use tutorbot_types::error::ConfigError;
use tutorbot_types::llm::ProviderKind;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] for the backend selected in `config`.
///
/// An explicit `base_url` overrides the well-known endpoint of `gemini` and
/// `openai`; `openai_compatible` requires one.
pub fn create_provider(
    config: &TutorConfig,
    api_key: &SecretString,
) -> Result<BoxLlmProvider, ConfigError> {
    let key = api_key.expose_secret();

    let mut oai_config = match config.provider {
        ProviderKind::Gemini => openai_compat::config::gemini_defaults(key, &config.model),
        ProviderKind::OpenAi => openai_compat::config::openai_defaults(key, &config.model),
        ProviderKind::OpenAiCompatible => {
            let base_url = config
                .base_url
                .as_deref()
                .ok_or(ConfigError::Missing("base_url"))?;
            openai_compat::config::custom(base_url, key, &config.model)
        }
    };

    if let Some(base_url) = config.base_url.as_deref() {
        oai_config.base_url = base_url.trim_end_matches('/').to_string();
    }

    tracing::debug!(
        kind = %config.provider,
        provider = %oai_config.provider_name,
        model = %config.model,
        "LLM provider configured"
    );

    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
}
