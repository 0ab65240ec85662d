//! Observability setup for Tutorbot binaries.

pub mod tracing_setup;
