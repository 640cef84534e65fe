//! Publishing the registry once a scan has completed.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::recorder::Metrics;
use crate::config::MetricsConfig;
use crate::error::{MonitorError, MonitorResult};

/// Where gathered metrics go after each scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exporter {
    /// Print the text exposition to stdout.
    Console,
    /// Push to a Prometheus push gateway.
    PushGateway { address: String, job: String },
    /// Metrics are scraped from `/metrics`; nothing to do after a scan.
    Scrape,
}

impl Exporter {
    pub fn from_config(config: &MetricsConfig) -> Self {
        match config {
            MetricsConfig::Console => Exporter::Console,
            MetricsConfig::PushGateway { push_address, job } => Exporter::PushGateway {
                address: push_address.clone(),
                job: job.clone(),
            },
            MetricsConfig::Http { .. } => Exporter::Scrape,
        }
    }

    /// Hands the current registry content to the configured destination.
    ///
    /// A push gateway that cannot be reached is logged and otherwise ignored,
    /// so the next scan still runs.
    pub async fn export(&self, metrics: &Metrics) -> MonitorResult<()> {
        match self {
            Exporter::Console => {
                println!("{}", metrics.render()?);
                Ok(())
            }
            Exporter::PushGateway { address, job } => {
                if let Err(e) = push(metrics, address, job).await {
                    warn!("Failed to push metrics to {}: {}", address, e);
                }
                Ok(())
            }
            Exporter::Scrape => {
                debug!("Metrics are exposed for scraping, nothing to export");
                Ok(())
            }
        }
    }
}

async fn push(metrics: &Metrics, address: &str, job: &str) -> MonitorResult<()> {
    let metric_families = metrics.registry().gather();
    let address = address.to_string();
    let job = job.to_string();

    // The push client is blocking.
    let url = address.clone();
    tokio::task::spawn_blocking(move || {
        prometheus::push_metrics(
            &job,
            HashMap::<String, String>::new(),
            &url,
            metric_families,
            None,
        )
    })
    .await
    .map_err(|e| MonitorError::Io(std::io::Error::other(e)))??;

    info!("Pushed metrics to {}", address);
    Ok(())
}
