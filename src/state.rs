//! State shared with the HTTP handlers.

use crate::metrics::Metrics;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry the scanner records into and `/metrics` renders from.
    pub metrics: Metrics,
}
