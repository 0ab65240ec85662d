//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline` to provide async line reading with
//! EOF (Ctrl+D) and interrupt (Ctrl+C) reported as events.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// User submitted a line, exactly as typed.
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

impl From<Result<ReadlineEvent, ReadlineError>> for InputEvent {
    fn from(result: Result<ReadlineEvent, ReadlineError>) -> Self {
        match result {
            Ok(ReadlineEvent::Line(line)) => InputEvent::Message(line),
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }
}

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create a new chat input handler with the given prompt.
    ///
    /// Returns the input handler and a `SharedWriter` for printing output
    /// without clobbering the prompt line.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    /// Read a line of input.
    pub async fn read_line(&mut self) -> InputEvent {
        let event: InputEvent = self.rl.readline().await.into();
        if let InputEvent::Message(ref line) = event {
            if !line.trim().is_empty() {
                self.rl.add_history_entry(line.clone());
            }
        }
        event
    }

    /// Restore the terminal before exiting.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
