//! Shared domain types for Tutorbot.
//!
//! This crate contains the domain types used across the Tutorbot workspace:
//! session identifiers, chat messages, LLM request shapes, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;
