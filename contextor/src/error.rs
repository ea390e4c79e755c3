//! Typed error for the pipeline.

use ai_llm_service::AiLlmError;
use rag_store::RagError;
use thiserror::Error;

/// Which stage of the pipeline failed.
///
/// Callers at the HTTP boundary deliberately render all variants the same
/// way; the distinction exists for logs.
#[derive(Debug, Error)]
pub enum ContextorError {
    /// The embedding call failed or returned a malformed body.
    #[error("embedding failed: {0}")]
    Embedding(#[source] AiLlmError),

    /// The document store was unreachable or rejected the query.
    #[error("document store failed: {0}")]
    Storage(#[source] RagError),

    /// The completion call failed or returned a malformed body.
    #[error("completion failed: {0}")]
    Completion(#[source] AiLlmError),
}

impl ContextorError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ContextorError::Embedding(_) => "embedding",
            ContextorError::Storage(_) => "storage",
            ContextorError::Completion(_) => "completion",
        }
    }
}

impl From<RagError> for ContextorError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Embedding(e) => ContextorError::Embedding(e),
            other => ContextorError::Storage(other),
        }
    }
}
