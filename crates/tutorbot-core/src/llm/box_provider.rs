//! Type-erased [`LlmProvider`].
//!
//! `LlmProvider::complete` returns `impl Future`, so the trait cannot be a
//! trait object. [`BoxLlmProvider`] erases the concrete provider so one
//! service type can run over any backend: the binaries hand it the
//! OpenAI-compatible provider, the application tests a scripted one.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tutorbot_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::LlmProvider;

/// Future returned by [`ErasedProvider::complete_erased`].
type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

/// Dyn-compatible mirror of [`LlmProvider`], implemented for every provider.
trait ErasedProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    fn complete_erased<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}

impl<P: LlmProvider> ErasedProvider for P {
    fn provider_name(&self) -> &str {
        self.name()
    }

    fn complete_erased<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.complete(request))
    }
}

/// An owned provider of any concrete type.
pub struct BoxLlmProvider(Box<dyn ErasedProvider>);

impl BoxLlmProvider {
    pub fn new<P: LlmProvider + 'static>(provider: P) -> Self {
        Self(Box::new(provider))
    }

    pub fn name(&self) -> &str {
        self.0.provider_name()
    }

    /// Send a completion request and wait for the full response.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.0.complete_erased(request).await
    }
}

impl fmt::Debug for BoxLlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxLlmProvider").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorbot_types::llm::{Message, Role, StopReason, Usage};

    struct Upper;

    impl LlmProvider for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let last = request
                .messages
                .last()
                .ok_or_else(|| LlmError::InvalidRequest("empty".to_string()))?;
            Ok(CompletionResponse {
                id: "u-1".to_string(),
                content: last.content.to_uppercase(),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    fn request(messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            model: "m".to_string(),
            messages,
            system: None,
            max_tokens: 16,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_boxed_provider_delegates() {
        let provider = BoxLlmProvider::new(Upper);
        assert_eq!(provider.name(), "upper");
        assert_eq!(format!("{provider:?}"), "BoxLlmProvider(\"upper\")");

        let response = provider
            .complete(&request(vec![Message {
                role: Role::User,
                content: "mean".to_string(),
            }]))
            .await
            .unwrap();
        assert_eq!(response.content, "MEAN");
    }

    #[tokio::test]
    async fn test_boxed_provider_passes_errors_through() {
        let provider = BoxLlmProvider::new(Upper);
        let result = provider.complete(&request(Vec::new())).await;
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
    }
}
