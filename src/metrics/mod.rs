//! Credential gauges and their export.
//!
//! The recorder owns a private Prometheus registry; the exporter publishes it
//! to the console, a push gateway, or leaves it to be scraped.

mod exporter;
mod recorder;

pub use exporter::Exporter;
pub use recorder::{Metrics, MetricsRecorder};
