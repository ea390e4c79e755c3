//! Thin adapter around `sqlx::PgPool` for the pgvector `documents` table.
//!
//! The pool is opened once at startup, owned by the caller, and closed at
//! shutdown. Connections are health-checked before each use, so a dropped
//! server connection is replaced on the next acquire instead of poisoning
//! every later request.

use sqlx::{
    Row,
    postgres::{PgPool, PgPoolOptions},
};
use tracing::{debug, error, info};

use crate::{
    config::{DistanceKind, RagConfig},
    embed::BoxFuture,
    errors::RagError,
    index::VectorIndex,
};

/// Pooled Postgres facade implementing [`VectorIndex`].
#[derive(Clone)]
pub struct PgVectorIndex {
    pool: PgPool,
    table: String,
    distance: DistanceKind,
}

impl PgVectorIndex {
    /// Connects the pool and verifies the database is reachable.
    ///
    /// # Errors
    /// - `RagError::Config` if the config does not validate
    /// - `RagError::Storage` if the first connection cannot be established
    pub async fn connect(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.acquire_timeout)
            .test_before_acquire(true)
            .connect(&cfg.database_url)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to connect to document store");
                RagError::Storage(e)
            })?;

        info!(
            table = %cfg.table,
            max_connections = cfg.max_connections,
            distance = ?cfg.distance,
            "connected to document store"
        );

        Ok(Self::from_pool(pool, cfg))
    }

    /// Wraps an existing pool (e.g. one shared with other components).
    pub fn from_pool(pool: PgPool, cfg: &RagConfig) -> Self {
        Self {
            pool,
            table: cfg.table.clone(),
            distance: cfg.distance,
        }
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("document store pool closed");
    }

    fn nearest_sql(&self) -> String {
        nearest_sql(&self.table, self.distance)
    }
}

impl VectorIndex for PgVectorIndex {
    fn nearest<'a>(
        &'a self,
        vector: &'a [f32],
        top_k: u32,
    ) -> BoxFuture<'a, Result<Vec<String>, RagError>> {
        Box::pin(async move {
            let sql = self.nearest_sql();
            let literal = vector_literal(vector);

            debug!(table = %self.table, dim = vector.len(), top_k, "nearest-neighbor query");

            let rows = sqlx::query(&sql)
                .bind(literal)
                .bind(i64::from(top_k))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    error!(error = %e, table = %self.table, dim = vector.len(), "nearest-neighbor query failed");
                    RagError::Storage(e)
                })?;

            rows.iter()
                .map(|row| row.try_get::<String, _>("content").map_err(RagError::Storage))
                .collect::<Result<Vec<String>, RagError>>()
        })
    }
}

/// `SELECT content ... ORDER BY embedding <op> $1::vector LIMIT $2`.
///
/// `table` must already be validated as a plain identifier.
pub(crate) fn nearest_sql(table: &str, distance: DistanceKind) -> String {
    format!(
        "SELECT content FROM {table} ORDER BY embedding {} $1::vector LIMIT $2",
        distance.operator()
    )
}

/// pgvector accepts vectors as text like `[1,2.5,-3]`.
pub(crate) fn vector_literal(v: &[f32]) -> String {
    let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
    format!("[{}]", parts.join(","))
}
