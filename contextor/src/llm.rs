//! Completion client: prompt assembly on top of a chat backend.

use std::sync::Arc;

use ai_llm_service::{AiLlmError, ChatMessage, OpenAiService};
use rag_store::BoxFuture;
use tracing::error;

use crate::{error::ContextorError, prompt::build_messages};

/// Chat backend that turns a message list into a reply.
pub trait ChatCompleter: Send + Sync {
    fn complete<'a>(&'a self, messages: &'a [ChatMessage])
    -> BoxFuture<'a, Result<String, AiLlmError>>;
}

impl ChatCompleter for OpenAiService {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
    ) -> BoxFuture<'a, Result<String, AiLlmError>> {
        Box::pin(self.chat(messages))
    }
}

/// Sends the user message plus retrieved context to the completion model.
#[derive(Clone)]
pub struct CompletionClient {
    completer: Arc<dyn ChatCompleter>,
}

impl CompletionClient {
    pub fn new(completer: Arc<dyn ChatCompleter>) -> Self {
        Self { completer }
    }

    /// Returns the model's reply for `user_message` grounded on `context`.
    ///
    /// # Errors
    /// Any backend failure becomes [`ContextorError::Completion`].
    pub async fn complete(
        &self,
        user_message: &str,
        context: &[String],
    ) -> Result<String, ContextorError> {
        let messages = build_messages(user_message, context);
        self.completer.complete(&messages).await.map_err(|e| {
            error!(error = %e, context_docs = context.len(), "completion call failed");
            ContextorError::Completion(e)
        })
    }
}
