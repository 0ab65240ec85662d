//! Session lifecycle and turn handling for Tutorbot.
//!
//! - [`session::SessionController`]: create a new session or resume one by name
//! - [`service::ConversationService`]: run one human/assistant turn against history
//! - [`generator::ResponseGenerator`]: the injected text generator the service calls
//! - [`prompt::TutorPromptBuilder`]: subject-scoped system prompt for the LLM generator

pub mod generator;
pub mod prompt;
pub mod service;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
