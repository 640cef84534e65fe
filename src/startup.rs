//! Wiring of the scanner, the exporter and, when configured, the scrape server.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::calculator::MetricsCalculator;
use crate::config::{ConfigV1, MetricsConfig};
use crate::error::{MonitorError, MonitorResult};
use crate::metrics::{Exporter, Metrics};
use crate::providers::create_application_source;
use crate::routes;
use crate::scan::{CredentialScanner, ScanSummary};
use crate::state::AppState;

/// Runs the monitor until it is done or asked to stop.
///
/// With `once` set, or without a scan interval, a single scan is run and its
/// error, if any, is returned. Otherwise scans repeat every interval until
/// Ctrl-C or SIGTERM; a failed scan is logged and the next one runs as planned.
/// The HTTP server, when configured, stops together with the scanning, so
/// serving metrics over HTTP is refused in one-shot mode.
pub async fn run(config: Arc<ConfigV1>, once: bool) -> MonitorResult<()> {
    if once && matches!(config.metrics, MetricsConfig::Http { .. }) {
        return Err(MonitorError::Config(
            "metrics.exporter 'http' cannot be combined with --once".into(),
        ));
    }

    let metrics = Metrics::new()?;
    let source = create_application_source(&config.graph)?;
    let scanner = CredentialScanner::new(
        source,
        metrics.clone(),
        MetricsCalculator::new(config.scan.no_expiry_horizon_years),
    );
    let exporter = Exporter::from_config(&config.metrics);

    let shutdown = CancellationToken::new();
    tokio::spawn(forward_shutdown_signal(shutdown.clone()));

    let server = match &config.metrics {
        MetricsConfig::Http { bind_address } => {
            Some(serve(bind_address, metrics.clone(), shutdown.clone()).await?)
        }
        _ => None,
    };

    let interval = config
        .scan
        .interval_in_seconds
        .filter(|_| !once)
        .map(Duration::from_secs);

    let result = match interval {
        Some(period) => {
            run_periodic(&scanner, &exporter, period, &shutdown).await;
            Ok(())
        }
        None => scan_and_export(&scanner, &exporter, &shutdown).await.map(|_| ()),
    };

    if let Some(server) = server {
        shutdown.cancel();
        server
            .await
            .map_err(|e| MonitorError::Io(std::io::Error::other(e)))??;
    }
    result
}

async fn scan_and_export(
    scanner: &CredentialScanner<Metrics>,
    exporter: &Exporter,
    shutdown: &CancellationToken,
) -> MonitorResult<ScanSummary> {
    let summary = scanner.scan(shutdown).await?;
    if !summary.cancelled {
        exporter.export(scanner.recorder()).await?;
    }
    Ok(summary)
}

/// Scans on a fixed schedule. A scan that outlasts the period delays the next
/// tick instead of overlapping with it.
async fn run_periodic(
    scanner: &CredentialScanner<Metrics>,
    exporter: &Exporter,
    period: Duration,
    shutdown: &CancellationToken,
) {
    info!("Scanning every {} seconds", period.as_secs());
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if let Err(e) = scan_and_export(scanner, exporter, shutdown).await {
            error!("Secret scan failed: {}", e);
        }
    }
    info!("Stopped scanning");
}

async fn serve(
    bind_address: &str,
    metrics: Metrics,
    shutdown: CancellationToken,
) -> MonitorResult<JoinHandle<MonitorResult<()>>> {
    let listener = TcpListener::bind(bind_address).await.map_err(|e| {
        MonitorError::Config(format!("Could not bind to '{}': {}", bind_address, e))
    })?;
    info!("Serving metrics on {}", bind_address);

    let app = routes::create_router(AppState { metrics });
    Ok(tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await?;
        Ok::<(), MonitorError>(())
    }))
}

async fn forward_shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown requested, finishing..");
    shutdown.cancel();
}
