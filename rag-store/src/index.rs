//! Nearest-neighbor lookup seam.

use crate::{embed::BoxFuture, errors::RagError};

/// A store that can rank documents by distance to a query vector.
///
/// Implementations return document contents ordered nearest first and never
/// more than `top_k` of them. Fewer (including none) is not an error.
pub trait VectorIndex: Send + Sync {
    fn nearest<'a>(
        &'a self,
        vector: &'a [f32],
        top_k: u32,
    ) -> BoxFuture<'a, Result<Vec<String>, RagError>>;
}
