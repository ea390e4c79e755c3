//! Retrieval-then-generation pipeline with a single public entry point.
//!
//! [`Contextor::ask`] embeds the message, retrieves the nearest documents
//! from `rag-store`, builds a fixed three-message prompt and returns the
//! completion model's reply. Steps run strictly one after another; the first
//! failure ends the request.

mod error;
mod llm;

pub mod prompt;

pub use error::ContextorError;
pub use llm::{ChatCompleter, CompletionClient};

use std::{sync::Arc, time::Instant};

use rag_store::RagStore;
use tracing::{debug, info};

/// The relay pipeline: retriever + completion client.
pub struct Contextor {
    store: RagStore,
    completion: CompletionClient,
}

impl Contextor {
    pub fn new(store: RagStore, completer: Arc<dyn ChatCompleter>) -> Self {
        Self {
            store,
            completion: CompletionClient::new(completer),
        }
    }

    /// Answers `message` using the nearest stored documents as context.
    ///
    /// # Errors
    /// - [`ContextorError::Embedding`] if the message could not be embedded;
    ///   no completion call is made
    /// - [`ContextorError::Storage`] if the document store failed
    /// - [`ContextorError::Completion`] if the completion call failed
    pub async fn ask(&self, message: &str) -> Result<String, ContextorError> {
        let started = Instant::now();

        let context = self.store.retrieve_context(message).await?;
        let retrieved_ms = started.elapsed().as_millis();
        debug!(docs = context.len(), retrieved_ms, "context ready");

        let reply = self.completion.complete(message, &context).await?;

        info!(
            docs = context.len(),
            retrieved_ms,
            total_ms = started.elapsed().as_millis(),
            "chat answered"
        );
        Ok(reply)
    }
}
