// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod config;
pub mod graph;
pub mod logging;
pub mod metrics;
pub mod scan;

pub use config::*;
pub use graph::*;
pub use logging::*;
pub use metrics::*;
pub use scan::*;
