//! HTTP/REST API layer for Tutorbot.
//!
//! Axum-based REST API at `/api/v1/` with the envelope response format and
//! CORS support. No authentication: every caller is trusted.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
