//! Interactive terminal chat for Tutorbot.
//!
//! Session selection (new or existing), greeting, history replay, then an
//! async input loop with a thinking spinner and markdown rendering.
//! Entry point: `loop_runner::run_chat`.

pub mod banner;
pub mod input;
pub mod loop_runner;
pub mod renderer;
