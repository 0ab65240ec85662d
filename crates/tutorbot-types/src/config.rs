//! Configuration types for Tutorbot.
//!
//! `TutorConfig` represents the optional `config.toml` in the data directory.
//! Every field has a default; secrets (the API key) never live here and are
//! read from the environment instead.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderKind;

/// Top-level configuration for the tutor.
///
/// Loaded from `~/.tutorbot/config.toml`, then overridden by environment
/// variables (see `tutorbot_infra::config`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// The single subject the tutor answers questions about.
    #[serde(default = "default_subject")]
    pub subject: String,

    /// LLM backend.
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Model identifier passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL override (required for `openai_compatible`).
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// History database URL. Defaults to `sqlite://{data_dir}/tutorbot.db`.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Path of the name -> session id mapping file. Defaults to
    /// `{data_dir}/user_data.json`.
    #[serde(default)]
    pub identity_file: Option<String>,
}

fn default_subject() -> String {
    "Data Science".to_string()
}

fn default_provider() -> ProviderKind {
    ProviderKind::Gemini
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            database_url: None,
            identity_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = TutorConfig::default();
        assert_eq!(config.subject, "Data Science");
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.model, "gemini-1.5-pro");
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: TutorConfig = toml::from_str("").unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn test_deserialize_with_values() {
        let toml_str = r#"
subject = "Statistics"
provider = "openai"
model = "gpt-4o"
temperature = 0.2
database_url = "sqlite:///tmp/stats.db"
"#;
        let config: TutorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.subject, "Statistics");
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.database_url.as_deref(), Some("sqlite:///tmp/stats.db"));
        assert!(config.identity_file.is_none());
    }
}
