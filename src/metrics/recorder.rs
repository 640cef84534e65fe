//! Metrics recording implementation using Prometheus.

use prometheus::{
    Encoder, GaugeVec, IntGaugeVec, Opts, Registry, TextEncoder, register_gauge_vec_with_registry,
    register_int_gauge_vec_with_registry,
};
use std::sync::Arc;

use crate::error::MonitorResult;
use crate::models::tags::{APPLICATION_LABELS, CREDENTIAL_LABELS};
use crate::models::Tags;

/// Sink for the credential gauges produced by a scan.
///
/// Recording is fire-and-forget; a recorder never fails a scan.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records the number of credentials of an application.
    fn record_credential_count(&self, count: i64, tags: &Tags);

    /// Records the age in days of a credential.
    fn record_credential_age(&self, days: f64, tags: &Tags);

    /// Records the days until a credential expires.
    fn record_credential_expiry(&self, days: f64, tags: &Tags);

    /// Forgets every series recorded so far.
    fn reset(&self);
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    credential_count: IntGaugeVec,
    credential_age_days: GaugeVec,
    credential_expiry_days: GaugeVec,
}

impl Metrics {
    /// Creates a new metrics instance with its own Prometheus registry.
    pub fn new() -> MonitorResult<Self> {
        let registry = Arc::new(Registry::new());

        let credential_count = register_int_gauge_vec_with_registry!(
            Opts::new(
                "entra_app_secret_count",
                "Number of credentials registered on an application"
            ),
            &APPLICATION_LABELS,
            registry.clone()
        )?;

        let credential_age_days = register_gauge_vec_with_registry!(
            Opts::new(
                "entra_app_secret_age_days",
                "Days since the credential became valid, -1 when unknown"
            ),
            &CREDENTIAL_LABELS,
            registry.clone()
        )?;

        let credential_expiry_days = register_gauge_vec_with_registry!(
            Opts::new(
                "entra_app_secret_expiry_days",
                "Days until the credential expires, 0 when expired"
            ),
            &CREDENTIAL_LABELS,
            registry.clone()
        )?;

        Ok(Metrics {
            registry,
            credential_count,
            credential_age_days,
            credential_expiry_days,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> MonitorResult<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsRecorder for Metrics {
    fn record_credential_count(&self, count: i64, tags: &Tags) {
        self.credential_count
            .with_label_values(&tags.values())
            .set(count);
    }

    fn record_credential_age(&self, days: f64, tags: &Tags) {
        self.credential_age_days
            .with_label_values(&tags.values())
            .set(days);
    }

    fn record_credential_expiry(&self, days: f64, tags: &Tags) {
        self.credential_expiry_days
            .with_label_values(&tags.values())
            .set(days);
    }

    fn reset(&self) {
        self.credential_count.reset();
        self.credential_age_days.reset();
        self.credential_expiry_days.reset();
    }
}
