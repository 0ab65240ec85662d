//! Tutorbot application layer.
//!
//! Shared by the `tutorbot` binary (terminal chat, history viewer, REST API)
//! and the `tutorbot-admin` maintenance tool.

pub mod cli;
pub mod http;
pub mod state;
