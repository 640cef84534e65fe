//! Age and time-to-expiry of credentials, in fractional days.

use chrono::{DateTime, Months, TimeDelta, Utc};

use crate::models::CredentialRecord;

/// Reported as age when a credential has no start date.
pub const UNKNOWN_AGE: f64 = -1.0;

/// Horizon used for credentials without an end date.
pub const DEFAULT_NO_EXPIRY_HORIZON_YEARS: u32 = 5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Derives the per-credential gauge values from a reference time.
///
/// Both computations are total: missing dates map to sentinels and negative
/// spans are clamped to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsCalculator {
    no_expiry_horizon_years: u32,
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_NO_EXPIRY_HORIZON_YEARS)
    }
}

impl MetricsCalculator {
    pub fn new(no_expiry_horizon_years: u32) -> Self {
        MetricsCalculator {
            no_expiry_horizon_years,
        }
    }

    /// Days since the credential became valid.
    ///
    /// Returns [`UNKNOWN_AGE`] without a start date and `0.0` when the start
    /// date lies in the future.
    pub fn age_in_days(&self, credential: &CredentialRecord, now: DateTime<Utc>) -> f64 {
        match credential.start_date_time() {
            None => UNKNOWN_AGE,
            Some(start) => total_days(now - start).max(0.0),
        }
    }

    /// Days until the credential expires.
    ///
    /// Returns `0.0` once expired. Without an end date the credential is
    /// treated as expiring at the configured horizon, measured in calendar
    /// years from `now`.
    pub fn expiry_in_days(&self, credential: &CredentialRecord, now: DateTime<Utc>) -> f64 {
        match credential.end_date_time() {
            None => self.no_expiry_in_days(now),
            Some(end) => total_days(end - now).max(0.0),
        }
    }

    fn no_expiry_in_days(&self, now: DateTime<Utc>) -> f64 {
        let horizon = now
            .checked_add_months(Months::new(self.no_expiry_horizon_years.saturating_mul(12)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        total_days(horizon - now)
    }
}

fn total_days(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawKeyCredential, RawPasswordCredential};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn secret(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> CredentialRecord {
        CredentialRecord::from_secret(RawPasswordCredential {
            start_date_time: start,
            end_date_time: end,
            ..Default::default()
        })
    }

    #[test]
    fn test_age_unknown_without_start() {
        let calc = MetricsCalculator::default();
        assert_eq!(calc.age_in_days(&secret(None, None), now()), -1.0);
    }

    #[test]
    fn test_age_zero_when_start_in_future() {
        let calc = MetricsCalculator::default();
        let cred = secret(Some(now() + Duration::days(3)), None);
        assert_eq!(calc.age_in_days(&cred, now()), 0.0);
    }

    #[test]
    fn test_age_is_fractional_and_monotonic() {
        let calc = MetricsCalculator::default();
        let cred = secret(Some(now() - Duration::hours(36)), None);

        assert_eq!(calc.age_in_days(&cred, now()), 1.5);
        assert!(calc.age_in_days(&cred, now() + Duration::hours(1)) > 1.5);
    }

    #[test]
    fn test_expiry_zero_when_expired() {
        let calc = MetricsCalculator::default();
        let cred = secret(None, Some(now() - Duration::days(10)));
        assert_eq!(calc.expiry_in_days(&cred, now()), 0.0);
    }

    #[test]
    fn test_expiry_days_remaining() {
        let calc = MetricsCalculator::default();
        let cred = secret(None, Some(now() + Duration::hours(30 * 24 + 6)));
        assert_eq!(calc.expiry_in_days(&cred, now()), 30.25);
    }

    #[test]
    fn test_expiry_without_end_is_five_calendar_years() {
        let calc = MetricsCalculator::default();
        let cred = secret(None, None);

        // 2024-06-15 -> 2029-06-15 spans one leap day (2028-02-29).
        assert_eq!(calc.expiry_in_days(&cred, now()), 1826.0);

        // 2027-06-15 -> 2032-06-15 spans two leap days.
        let later = Utc.with_ymd_and_hms(2027, 6, 15, 0, 0, 0).unwrap();
        assert_eq!(calc.expiry_in_days(&cred, later), 1827.0);
    }

    #[test]
    fn test_expiry_without_end_from_leap_day() {
        let calc = MetricsCalculator::default();
        let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();

        // Lands on 2029-02-28.
        let days = calc.expiry_in_days(&secret(None, None), leap_day);
        assert_eq!(days, 1826.0);
    }

    #[test]
    fn test_configured_horizon() {
        let calc = MetricsCalculator::new(1);
        assert_eq!(calc.expiry_in_days(&secret(None, None), now()), 365.0);
    }

    #[test]
    fn test_same_values_for_certificate_and_secret() {
        let calc = MetricsCalculator::default();
        let start = Some(now() - Duration::days(100));
        let end = Some(now() + Duration::days(265));

        let certificate = CredentialRecord::from_certificate(RawKeyCredential {
            start_date_time: start,
            end_date_time: end,
            ..Default::default()
        });
        let secret = secret(start, end);

        assert_eq!(
            calc.age_in_days(&certificate, now()),
            calc.age_in_days(&secret, now())
        );
        assert_eq!(
            calc.expiry_in_days(&certificate, now()),
            calc.expiry_in_days(&secret, now())
        );
    }
}
