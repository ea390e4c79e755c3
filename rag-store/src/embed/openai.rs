//! Embedding provider backed by the OpenAI-compatible `/v1/embeddings` endpoint.

use ai_llm_service::OpenAiService;

use crate::{EmbeddingsProvider, RagError, embed::BoxFuture};

impl EmbeddingsProvider for OpenAiService {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        Box::pin(async move { self.embeddings(text).await.map_err(RagError::from) })
    }
}
