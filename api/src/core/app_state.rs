use std::sync::Arc;

use contextor::Contextor;

/// Shared state for all HTTP handlers.
///
/// Built once in `main` and handed to the router; nothing here is mutated
/// after startup.
#[derive(Clone)]
pub struct AppState {
    /// Retrieval + completion pipeline.
    pub contextor: Arc<Contextor>,
}

impl AppState {
    pub fn new(contextor: Arc<Contextor>) -> Self {
        Self { contextor }
    }
}
