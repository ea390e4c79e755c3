//! Runtime configuration for the document store.

use std::{str::FromStr, time::Duration};

use crate::errors::RagError;

/// Distance function used by the nearest-neighbor query.
///
/// Each kind maps to a pgvector operator; the stored vectors must have been
/// written for the same metric to get meaningful rankings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceKind {
    /// Euclidean distance (L2), `<->`.
    #[default]
    Euclid,
    /// Cosine distance, `<=>`.
    Cosine,
    /// Negative inner product, `<#>`.
    InnerProduct,
}

impl DistanceKind {
    /// The pgvector operator for this metric. Smaller is always nearer.
    pub fn operator(self) -> &'static str {
        match self {
            DistanceKind::Euclid => "<->",
            DistanceKind::Cosine => "<=>",
            DistanceKind::InnerProduct => "<#>",
        }
    }
}

impl FromStr for DistanceKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l2" | "euclid" | "euclidean" => Ok(DistanceKind::Euclid),
            "cosine" => Ok(DistanceKind::Cosine),
            "ip" | "inner_product" | "dot" => Ok(DistanceKind::InnerProduct),
            other => Err(RagError::Config(format!("unknown distance kind: {other}"))),
        }
    }
}

/// Configuration for the document store and retrieval.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Table holding `content` and `embedding` columns.
    pub table: String,
    /// Number of nearest documents to return.
    pub top_k: u32,
    /// Distance operator used for ordering.
    pub distance: DistanceKind,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a pooled connection before failing the query.
    pub acquire_timeout: Duration,
}

impl RagConfig {
    /// Creates a default config for the given connection string.
    pub fn new_default(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            table: "documents".into(),
            top_k: 3,
            distance: DistanceKind::Euclid,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
        }
    }

    /// Builds the config from environment variables.
    ///
    /// - `DATABASE_URL` (or `NEON_DB_URL`) — required
    /// - `DOCUMENTS_TABLE` — default `documents`
    /// - `RAG_TOP_K` — default `3`
    /// - `RAG_DISTANCE` — `l2` (default) | `cosine` | `ip`
    /// - `DB_MAX_CONNECTIONS` — default `5`
    ///
    /// # Errors
    /// Returns `RagError::Config` if a variable is missing or malformed.
    pub fn from_env() -> Result<Self, RagError> {
        let url = env("DATABASE_URL")
            .or_else(|| env("NEON_DB_URL"))
            .ok_or_else(|| RagError::Config("DATABASE_URL or NEON_DB_URL must be set".into()))?;

        let mut cfg = Self::new_default(url);
        if let Some(t) = env("DOCUMENTS_TABLE") {
            cfg.table = t;
        }
        if let Some(k) = env("RAG_TOP_K") {
            cfg.top_k = parse("RAG_TOP_K", &k)?;
        }
        if let Some(d) = env("RAG_DISTANCE") {
            cfg.distance = d.parse()?;
        }
        if let Some(n) = env("DB_MAX_CONNECTIONS") {
            cfg.max_connections = parse("DB_MAX_CONNECTIONS", &n)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.database_url.trim().is_empty() {
            return Err(RagError::Config("database_url is empty".into()));
        }
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be > 0".into()));
        }
        if self.max_connections == 0 {
            return Err(RagError::Config("max_connections must be > 0".into()));
        }
        if !is_plain_identifier(&self.table) {
            return Err(RagError::Config(format!(
                "table `{}` must be a plain SQL identifier ([A-Za-z_][A-Za-z0-9_]*)",
                self.table
            )));
        }
        Ok(())
    }
}

/// The table name is interpolated into SQL, so only bare identifiers pass.
fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse<T: FromStr>(var: &str, raw: &str) -> Result<T, RagError> {
    raw.parse::<T>()
        .map_err(|_| RagError::Config(format!("invalid number in {var}: `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documents_table_top3() {
        let cfg = RagConfig::new_default("postgres://localhost/db");
        assert_eq!(cfg.table, "documents");
        assert_eq!(cfg.top_k, 3);
        assert_eq!(cfg.distance.operator(), "<->");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_unsafe_table_names() {
        let mut cfg = RagConfig::new_default("postgres://localhost/db");
        for bad in ["", "1docs", "docs; DROP TABLE x", "public.documents", "dö"] {
            cfg.table = bad.into();
            assert!(cfg.validate().is_err(), "accepted {bad:?}");
        }
        cfg.table = "_kb_docs2".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_top_k() {
        let mut cfg = RagConfig::new_default("postgres://localhost/db");
        cfg.top_k = 0;
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }

    #[test]
    fn parses_distance_kinds() {
        assert_eq!("cosine".parse::<DistanceKind>().unwrap(), DistanceKind::Cosine);
        assert_eq!(" L2 ".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
        assert_eq!("ip".parse::<DistanceKind>().unwrap().operator(), "<#>");
        assert!("manhattan".parse::<DistanceKind>().is_err());
    }
}
