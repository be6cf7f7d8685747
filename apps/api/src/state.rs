use std::sync::Arc;

use crate::query::pipeline::QueryPipeline;
use crate::results::ResultStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QueryPipeline>,
    /// Results keyed by request id.
    pub results: ResultStore,
}
