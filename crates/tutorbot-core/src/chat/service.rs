//! Conversation service running one tutoring turn against persisted history.
//!
//! ConversationService coordinates the HistoryRepository and the
//! ResponseGenerator: load history, record the learner's message, generate
//! the reply, record the reply, return it.

use tracing::{info, warn};

use tutorbot_types::chat::{ChatMessage, MessageRole};
use tutorbot_types::error::ChatError;

use crate::chat::generator::{GenerationRequest, ResponseGenerator};
use crate::chat::session::SessionContext;
use crate::history::repository::HistoryRepository;

/// Reply given to an empty prompt. Nothing is persisted for it.
///
/// Only `""` counts as empty. A whitespace-only prompt is a real turn.
pub const EMPTY_PROMPT_RESPONSE: &str = "Please enter a message.";

/// What a call to [`ConversationService::handle_turn`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The prompt was the empty string; the fixed instruction was returned
    /// and no history was written.
    Instruction(&'static str),
    /// A full turn was recorded.
    Reply {
        human: ChatMessage,
        assistant: ChatMessage,
    },
}

impl TurnOutcome {
    /// The text to show the learner. For a reply this is exactly the stored
    /// assistant message.
    pub fn response_text(&self) -> &str {
        match self {
            TurnOutcome::Instruction(text) => *text,
            TurnOutcome::Reply { assistant, .. } => assistant.content.as_str(),
        }
    }
}

/// Orchestrates a single human/assistant turn.
///
/// Generic over `HistoryRepository` and `ResponseGenerator` to maintain
/// clean architecture (tutorbot-core never depends on tutorbot-infra).
pub struct ConversationService<H: HistoryRepository, G: ResponseGenerator> {
    history: H,
    generator: G,
}

impl<H: HistoryRepository, G: ResponseGenerator> ConversationService<H, G> {
    pub fn new(history: H, generator: G) -> Self {
        Self { history, generator }
    }

    /// Access the history repository.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Access the response generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Run one turn for the session in `context`.
    ///
    /// The human message is appended before generation starts and the
    /// assistant message only after generation succeeds. On a generation
    /// failure the turn is left incomplete: the human message stays, no
    /// assistant message is written, and the error is returned.
    pub async fn handle_turn(
        &self,
        context: &SessionContext,
        prompt: &str,
    ) -> Result<TurnOutcome, ChatError> {
        if prompt.is_empty() {
            return Ok(TurnOutcome::Instruction(EMPTY_PROMPT_RESPONSE));
        }

        let session_id = context.session_id();
        let prior = self.history.load(session_id).await?;

        let human = self
            .history
            .append(session_id, MessageRole::Human, prompt)
            .await?;

        let reply = match self
            .generator
            .generate(GenerationRequest {
                user_name: context.user_name(),
                history: &prior,
                prompt,
            })
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Turn incomplete: generation failed");
                return Err(ChatError::Generation(e));
            }
        };

        let assistant = self
            .history
            .append(session_id, MessageRole::Assistant, &reply)
            .await?;

        info!(
            session_id = %session_id,
            human_ordinal = human.ordinal,
            assistant_ordinal = assistant.ordinal,
            "Turn recorded"
        );

        Ok(TurnOutcome::Reply { human, assistant })
    }
}
