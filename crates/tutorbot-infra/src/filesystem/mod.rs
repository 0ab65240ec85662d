//! Filesystem adapters for Tutorbot.
//!
//! Holds the JSON identity file and the data directory layout:
//! `{data_dir}/config.toml`, `{data_dir}/tutorbot.db`, `{data_dir}/user_data.json`.

pub mod identity;

use std::path::{Path, PathBuf};

/// File name of the name -> session id mapping inside the data directory.
pub const IDENTITY_FILE_NAME: &str = "user_data.json";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `TUTORBOT_DATA_DIR` environment variable
/// 2. `~/.tutorbot`
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var("TUTORBOT_DATA_DIR").ok())
}

fn data_dir_from(env_value: Option<String>) -> PathBuf {
    if let Some(dir) = env_value.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".tutorbot");
    }

    // Last resort: current directory
    PathBuf::from(".tutorbot")
}

/// Default identity file path: `{data_dir}/user_data.json`.
pub fn default_identity_path(data_dir: &Path) -> PathBuf {
    data_dir.join(IDENTITY_FILE_NAME)
}
