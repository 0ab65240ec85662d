//! Business logic and repository trait definitions for Tutorbot.
//!
//! This crate defines the "ports" (identity store, history repository, LLM
//! provider) that the infrastructure layer implements, plus the session
//! controller and conversation orchestrator built on top of them. It depends
//! only on `tutorbot-types` -- never on `tutorbot-infra` or any database/IO crate.

pub mod chat;
pub mod history;
pub mod identity;
pub mod llm;
