//! Conversation history persistence abstractions for Tutorbot.
//!
//! This module defines the `HistoryRepository` trait that the infrastructure
//! layer implements: an append-only, per-session ordered message log.

pub mod repository;
