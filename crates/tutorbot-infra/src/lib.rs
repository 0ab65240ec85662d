//! Infrastructure layer for Tutorbot.
//!
//! Contains implementations of the ports defined in `tutorbot-core`:
//! SQLite message history, the JSON identity file, and the OpenAI-compatible
//! LLM provider. Also resolves runtime configuration from disk and environment.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
