//! Similarity retrieval over a Postgres `documents` table with pgvector.
//!
//! This crate provides:
//! - [`RagStore::retrieve_context`]: embed a query and return the contents of
//!   the nearest stored documents, nearest first
//! - [`PgVectorIndex`]: the pooled Postgres facade behind it
//! - [`EmbeddingsProvider`] / [`VectorIndex`]: the two seams the store is built on
//!
//! Documents are owned by the database; this crate only reads them.

mod config;
mod errors;
mod index;
mod pg_facade;
mod retrieve;

pub mod embed;

pub use config::{DistanceKind, RagConfig};
pub use embed::{BoxFuture, EmbeddingsProvider};
pub use errors::RagError;
pub use index::VectorIndex;
pub use pg_facade::PgVectorIndex;

use std::sync::Arc;

use tracing::trace;

/// High-level facade that wires configuration, embedder and vector index.
///
/// Cheap to share behind an `Arc`; it holds no per-request state.
pub struct RagStore {
    cfg: RagConfig,
    embedder: Arc<dyn EmbeddingsProvider>,
    index: Arc<dyn VectorIndex>,
}

impl RagStore {
    /// Constructs a store from already-built parts.
    ///
    /// # Errors
    /// Returns `RagError::Config` if the config does not validate.
    pub fn new(
        cfg: RagConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Result<Self, RagError> {
        cfg.validate()?;
        trace!("RagStore::new table={} top_k={}", cfg.table, cfg.top_k);
        Ok(Self {
            cfg,
            embedder,
            index,
        })
    }

    /// Returns up to `top_k` document contents most similar to `query`,
    /// ordered by ascending distance.
    ///
    /// # Errors
    /// - `RagError::Embedding` if the query could not be embedded (the index
    ///   is not queried in that case)
    /// - `RagError::Storage` if the nearest-neighbor query fails
    pub async fn retrieve_context(&self, query: &str) -> Result<Vec<String>, RagError> {
        retrieve::retrieve_context(&self.cfg, self.embedder.as_ref(), self.index.as_ref(), query)
            .await
    }

    /// Active configuration.
    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }
}
