//! Runtime configuration loader for Tutorbot.
//!
//! Reads `config.toml` from the data directory (`~/.tutorbot/` in production)
//! into [`TutorConfig`], then applies environment overrides and resolves the
//! database URL, identity file path, and API key into a [`RuntimeConfig`].

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use tutorbot_types::config::TutorConfig;
use tutorbot_types::error::ConfigError;
use tutorbot_types::llm::ProviderKind;

use crate::filesystem::default_identity_path;
use crate::sqlite::pool::default_database_url;

/// Environment variable names, most specific first where there is a fallback.
pub const ENV_DATABASE_URL: &str = "TUTORBOT_DATABASE_URL";
pub const ENV_API_KEY: &str = "TUTORBOT_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "API_KEY";
pub const ENV_MODEL: &str = "TUTORBOT_MODEL";
pub const ENV_PROVIDER: &str = "TUTORBOT_PROVIDER";
pub const ENV_BASE_URL: &str = "TUTORBOT_BASE_URL";
pub const ENV_IDENTITY_FILE: &str = "TUTORBOT_IDENTITY_FILE";

/// Fully resolved settings the binaries start from.
///
/// Does NOT derive Debug: it holds the API key.
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub tutor: TutorConfig,
    pub database_url: String,
    pub identity_path: PathBuf,
    api_key: Option<SecretString>,
}

impl RuntimeConfig {
    /// The provider API key, required by anything that generates replies.
    pub fn require_api_key(&self) -> Result<&SecretString, ConfigError> {
        self.api_key.as_ref().ok_or(ConfigError::Missing(ENV_API_KEY))
    }
}

/// Load configuration for `data_dir` using the process environment.
pub async fn load_config(data_dir: &Path) -> Result<RuntimeConfig, ConfigError> {
    let file_config = load_tutor_config(data_dir).await;
    resolve(data_dir, file_config, |key| std::env::var(key).ok())
}

/// Resolve only the history database URL for `data_dir`.
///
/// For tools that touch nothing but the database: `TUTORBOT_DATABASE_URL`,
/// then `database_url` from `config.toml`, then the default. Provider, model
/// and temperature settings are neither read nor validated, so a bad value
/// there does not stop the tool.
pub async fn load_database_url(data_dir: &Path) -> String {
    database_url_with(data_dir, |key| std::env::var(key).ok()).await
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    #[serde(default)]
    database_url: Option<String>,
}

async fn database_url_with(data_dir: &Path, env: impl Fn(&str) -> Option<String>) -> String {
    if let Some(url) = env(ENV_DATABASE_URL).filter(|v| !v.trim().is_empty()) {
        return url;
    }

    let config_path = data_dir.join("config.toml");
    let section = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => toml::from_str::<DatabaseSection>(&content).unwrap_or_else(|err| {
            tracing::warn!("Failed to parse {}: {err}, using default database", config_path.display());
            DatabaseSection::default()
        }),
        Err(_) => DatabaseSection::default(),
    };

    section
        .database_url
        .unwrap_or_else(|| default_database_url(data_dir))
}

/// Load `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`TutorConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and returns the default.
pub async fn load_tutor_config(data_dir: &Path) -> TutorConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return TutorConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return TutorConfig::default();
        }
    };

    match toml::from_str::<TutorConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            TutorConfig::default()
        }
    }
}

/// Apply environment overrides on top of the file config and fill defaults.
///
/// `env` looks a variable up by name; blank values count as unset.
pub fn resolve(
    data_dir: &Path,
    mut tutor: TutorConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<RuntimeConfig, ConfigError> {
    let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(model) = var(ENV_MODEL) {
        tutor.model = model;
    }
    if let Some(provider) = var(ENV_PROVIDER) {
        tutor.provider = provider
            .parse::<ProviderKind>()
            .map_err(|message| ConfigError::Invalid {
                key: ENV_PROVIDER,
                message,
            })?;
    }
    if let Some(base_url) = var(ENV_BASE_URL) {
        tutor.base_url = Some(base_url);
    }
    if let Some(url) = var(ENV_DATABASE_URL) {
        tutor.database_url = Some(url);
    }
    if let Some(path) = var(ENV_IDENTITY_FILE) {
        tutor.identity_file = Some(path);
    }

    if tutor.provider == ProviderKind::OpenAiCompatible && tutor.base_url.is_none() {
        return Err(ConfigError::Missing("base_url"));
    }
    if !(0.0..=2.0).contains(&tutor.temperature) {
        return Err(ConfigError::Invalid {
            key: "temperature",
            message: format!("{} is outside 0.0..=2.0", tutor.temperature),
        });
    }

    let database_url = tutor
        .database_url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir));
    let identity_path = tutor
        .identity_file
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_identity_path(data_dir));
    let api_key = var(ENV_API_KEY)
        .or_else(|| var(ENV_API_KEY_FALLBACK))
        .map(SecretString::from);

    Ok(RuntimeConfig {
        data_dir: data_dir.to_path_buf(),
        tutor,
        database_url,
        identity_path,
        api_key,
    })
}
