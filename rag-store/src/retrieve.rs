//! Retrieval: embed the query, then ask the index for its nearest documents.

use std::time::Instant;

use tracing::{debug, error, trace};

use crate::{
    config::RagConfig, embed::EmbeddingsProvider, errors::RagError, index::VectorIndex,
};

/// Embeds `query` and returns up to `cfg.top_k` contents, nearest first.
///
/// # Errors
/// Embedding errors are returned before the index is touched; index errors
/// are returned as-is.
pub async fn retrieve_context(
    cfg: &RagConfig,
    embedder: &dyn EmbeddingsProvider,
    index: &dyn VectorIndex,
    query: &str,
) -> Result<Vec<String>, RagError> {
    trace!("retrieve::retrieve_context top_k={} query_len={}", cfg.top_k, query.len());
    let started = Instant::now();

    let qv = embedder.embed(query).await.inspect_err(|e| {
        error!(error = %e, "failed to embed query");
    })?;

    let mut docs = index.nearest(&qv, cfg.top_k).await?;
    docs.truncate(cfg.top_k as usize);

    debug!(
        dim = qv.len(),
        hits = docs.len(),
        latency_ms = started.elapsed().as_millis(),
        "context retrieved"
    );
    Ok(docs)
}
