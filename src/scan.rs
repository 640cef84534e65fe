//! One full pass over the directory's application registrations.
//!
//! A scan pulls pages from the [`ApplicationSource`], normalizes every record
//! into an [`ApplicationRecord`] and records one count sample per application
//! plus an age and an expiry sample per credential. All values of a scan are
//! computed against the same `time_of_scan`.

use std::pin::pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn};

use crate::calculator::MetricsCalculator;
use crate::error::{MonitorError, MonitorResult};
use crate::metrics::MetricsRecorder;
use crate::models::ApplicationRecord;
use crate::providers::{application_pages, ApplicationSource};

/// Counters describing a finished scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub started_at: DateTime<Utc>,
    pub pages: usize,
    pub applications: usize,
    pub credentials: usize,
    /// The scan stopped early because cancellation was requested.
    pub cancelled: bool,
}

impl ScanSummary {
    fn new(started_at: DateTime<Utc>) -> Self {
        ScanSummary {
            started_at,
            pages: 0,
            applications: 0,
            credentials: 0,
            cancelled: false,
        }
    }
}

/// Drives scans and feeds the results into a [`MetricsRecorder`].
///
/// Holds no state between scans, so the same scanner can run any number of
/// them one after the other.
pub struct CredentialScanner<R: MetricsRecorder> {
    source: Arc<dyn ApplicationSource>,
    recorder: R,
    calculator: MetricsCalculator,
}

impl<R: MetricsRecorder> CredentialScanner<R> {
    pub fn new(source: Arc<dyn ApplicationSource>, recorder: R, calculator: MetricsCalculator) -> Self {
        CredentialScanner {
            source,
            recorder,
            calculator,
        }
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Runs a scan with the current time as reference.
    pub async fn scan(&self, cancel: &CancellationToken) -> MonitorResult<ScanSummary> {
        self.scan_at(Utc::now(), cancel).await
    }

    /// Runs a scan computing every value relative to `time_of_scan`.
    ///
    /// A failed page fetch ends the scan with that error; samples recorded
    /// for earlier pages are kept. The recorder is reset once the first fetch
    /// succeeds, so registrations removed upstream disappear from the output
    /// while a scan that cannot reach Graph at all leaves the previous values
    /// in place.
    pub async fn scan_at(
        &self,
        time_of_scan: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> MonitorResult<ScanSummary> {
        info!(
            "Starting secret scan of '{}'..",
            self.source.get_name()
        );
        let mut summary = ScanSummary::new(time_of_scan);

        let mut pages = pin!(application_pages(self.source.as_ref(), cancel.clone()));
        loop {
            let page = match pages.try_next().await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(MonitorError::Cancelled) => {
                    summary.cancelled = true;
                    break;
                }
                Err(e) => return Err(e),
            };
            if summary.pages == 0 {
                self.recorder.reset();
            }
            summary.pages += 1;
            debug!(
                page = summary.pages,
                applications = page.applications.len(),
                "Processing page"
            );

            for raw in page.applications {
                let application = ApplicationRecord::from(raw);
                self.report_metrics(&application, time_of_scan);
                summary.applications += 1;
                summary.credentials += application.credential_count();
            }
        }

        if summary.cancelled {
            warn!(
                "Secret scan cancelled after {} pages",
                summary.pages
            );
            return Ok(summary);
        }

        if summary.pages == 0 {
            // The directory answered, just without data.
            self.recorder.reset();
        }
        if summary.applications == 0 {
            warn!("No applications found..");
        }

        info!(
            pages = summary.pages,
            applications = summary.applications,
            credentials = summary.credentials,
            "Secret scan completed.."
        );
        Ok(summary)
    }

    fn report_metrics(&self, application: &ApplicationRecord, time_of_scan: DateTime<Utc>) {
        let span = info_span!(
            "application",
            object_id = application.id(),
            app_id = application.client_id(),
            app_name = application.display_name().unwrap_or_default()
        );
        let _entered = span.enter();
        debug!("Processing application..");

        self.recorder
            .record_credential_count(application.credential_count() as i64, &application.tags());

        for credential in application.credentials() {
            let span = info_span!(
                "credential",
                key_id = credential.key_id(),
                key_name = credential.key_name().unwrap_or_default()
            );
            let _entered = span.enter();
            debug!("Processing application credential..");

            let tags = credential.tags();
            let record = credential.record();
            self.recorder.record_credential_age(
                self.calculator.age_in_days(record, time_of_scan),
                &tags,
            );
            self.recorder.record_credential_expiry(
                self.calculator.expiry_in_days(record, time_of_scan),
                &tags,
            );
        }
    }
}
