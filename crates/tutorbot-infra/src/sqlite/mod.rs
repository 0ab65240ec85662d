//! SQLite storage for conversation history.

pub mod history;
pub mod pool;
