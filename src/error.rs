//! Error types shared by the Graph client, the metrics sink and startup.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors that can abort a scan or prevent the monitor from starting.
///
/// Missing or malformed optional fields in Graph payloads are never errors;
/// they degrade to absent values while the records are normalized.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Access token could not be acquired.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Microsoft Graph answered with a non-success status.
    #[error("Graph API error ({status}): {code} - {message}")]
    Graph {
        status: u16,
        code: String,
        message: String,
    },

    /// Transport level failure while talking to Graph.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Metric registration or export failure.
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Paging stopped because shutdown was requested.
    #[error("Scan cancelled")]
    Cancelled,
}
