//! Response generation seam.
//!
//! The conversation service never talks to an LLM directly. It calls a
//! [`ResponseGenerator`], which tests replace with a deterministic stand-in.
//! [`LlmResponseGenerator`] is the production implementation: it turns the
//! stored history into a completion request for a [`BoxLlmProvider`].

use std::time::Instant;

use tracing::debug;

use tutorbot_types::chat::{ChatMessage, MessageRole};
use tutorbot_types::llm::{CompletionRequest, LlmError, Message, Role};

use crate::chat::prompt::TutorPromptBuilder;
use crate::llm::box_provider::BoxLlmProvider;

/// Everything a generator sees for one turn.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Display name of the learner, passed as contextual metadata.
    pub user_name: &'a str,
    /// Prior messages of the session, oldest first. Excludes `prompt`.
    pub history: &'a [ChatMessage],
    /// The new human message.
    pub prompt: &'a str,
}

/// Produces the assistant's reply for one turn: (history, prompt) -> text.
pub trait ResponseGenerator: Send + Sync {
    fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}

/// Model parameters for [`LlmResponseGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub subject: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// [`ResponseGenerator`] backed by an LLM provider.
pub struct LlmResponseGenerator {
    provider: BoxLlmProvider,
    settings: GeneratorSettings,
}

impl LlmResponseGenerator {
    pub fn new(provider: BoxLlmProvider, settings: GeneratorSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Build the completion request: system prompt, then history, then the prompt.
    pub fn build_request(&self, request: GenerationRequest<'_>) -> CompletionRequest {
        let mut messages: Vec<Message> = request
            .history
            .iter()
            .map(|m| Message {
                role: match m.role {
                    MessageRole::Human => Role::User,
                    MessageRole::Assistant => Role::Assistant,
                },
                content: m.content.clone(),
            })
            .collect();

        messages.push(Message {
            role: Role::User,
            content: request.prompt.to_string(),
        });

        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            system: Some(TutorPromptBuilder::build(
                &self.settings.subject,
                request.user_name,
            )),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        }
    }
}

impl ResponseGenerator for LlmResponseGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, LlmError> {
        let completion = self.build_request(request);
        let start = Instant::now();

        let response = self.provider.complete(&completion).await?;

        debug!(
            provider = self.provider.name(),
            model = %response.model,
            stop_reason = %response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "completion received"
        );

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LlmProvider;
    use std::sync::{Arc, Mutex};
    use tutorbot_types::llm::{CompletionResponse, StopReason, Usage};
    use tutorbot_types::session::SessionId;

    /// Provider that records the last request and echoes a fixed reply.
    struct MockProvider {
        reply: Result<String, ()>,
        seen: Arc<Mutex<Option<CompletionRequest>>>,
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    id: "resp-1".to_string(),
                    content: text.clone(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                Err(()) => Err(LlmError::Provider {
                    message: "upstream unavailable".to_string(),
                }),
            }
        }
    }

    fn settings() -> GeneratorSettings {
        GeneratorSettings {
            subject: "Data Science".to_string(),
            model: "gemini-1.5-pro".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    fn message(role: MessageRole, content: &str, ordinal: i64) -> ChatMessage {
        ChatMessage {
            ordinal,
            session_id: SessionId::new(),
            role,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_request_maps_history_then_prompt() {
        let seen = Arc::new(Mutex::new(None));
        let generator = LlmResponseGenerator::new(
            BoxLlmProvider::new(MockProvider {
                reply: Ok("Regularization shrinks weights.".to_string()),
                seen: seen.clone(),
            }),
            settings(),
        );

        let history = vec![
            message(MessageRole::Human, "What is overfitting?", 1),
            message(MessageRole::Assistant, "Memorizing noise.", 2),
        ];
        let reply = generator
            .generate(GenerationRequest {
                user_name: "alice",
                history: &history,
                prompt: "How do I prevent it?",
            })
            .await
            .unwrap();
        assert_eq!(reply, "Regularization shrinks weights.");

        let request = seen.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "gemini-1.5-pro");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.messages[1].role, Role::Assistant);
        assert_eq!(request.messages[2].content, "How do I prevent it?");
        assert!(request.system.unwrap().contains("alice is your name!"));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let generator = LlmResponseGenerator::new(
            BoxLlmProvider::new(MockProvider {
                reply: Err(()),
                seen: Arc::new(Mutex::new(None)),
            }),
            settings(),
        );

        let result = generator
            .generate(GenerationRequest {
                user_name: "bob",
                history: &[],
                prompt: "hello",
            })
            .await;
        assert!(matches!(result, Err(LlmError::Provider { .. })));
        assert_eq!(generator.provider_name(), "mock");
    }
}
