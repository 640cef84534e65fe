use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::graph::{RawKeyCredential, RawPasswordCredential};

/// A certificate or client secret, normalized to one shape.
///
/// Certificates and secrets only differ in where they come from, so both are
/// mapped onto this record and nothing downstream looks at the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    key_id: String,
    key_name: Option<String>,
    start_date_time: Option<DateTime<Utc>>,
    end_date_time: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// Normalizes a certificate credential.
    pub fn from_certificate(raw: RawKeyCredential) -> Self {
        Self::normalize(
            raw.key_id,
            raw.display_name,
            raw.start_date_time,
            raw.end_date_time,
        )
    }

    /// Normalizes a client secret credential.
    pub fn from_secret(raw: RawPasswordCredential) -> Self {
        Self::normalize(
            raw.key_id,
            raw.display_name,
            raw.start_date_time,
            raw.end_date_time,
        )
    }

    fn normalize(
        key_id: Option<Uuid>,
        key_name: Option<String>,
        start_date_time: Option<DateTime<Utc>>,
        end_date_time: Option<DateTime<Utc>>,
    ) -> Self {
        CredentialRecord {
            key_id: key_id.unwrap_or_else(Uuid::nil).to_string(),
            key_name,
            start_date_time,
            end_date_time,
        }
    }

    /// Lowercase hyphenated key id; the nil UUID when Graph did not provide one.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn key_name(&self) -> Option<&str> {
        self.key_name.as_deref()
    }

    pub fn start_date_time(&self) -> Option<DateTime<Utc>> {
        self.start_date_time
    }

    pub fn end_date_time(&self) -> Option<DateTime<Utc>> {
        self.end_date_time
    }
}
