//! Wire types for the Microsoft Graph `/applications` endpoint.
//!
//! Only the fields the monitor consumes are modelled. Credential fields are
//! decoded leniently: a key id that is not a UUID or a timestamp that is not
//! RFC 3339 becomes `None` instead of failing the whole page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// Fields requested from Graph with `$select`.
pub const APPLICATION_SELECT: &str = "id,appId,displayName,keyCredentials,passwordCredentials";

/// One page of a Graph collection response.
#[derive(Debug, Deserialize)]
pub struct ODataPage<T> {
    #[serde(default)]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// `OData` error envelope returned by Graph on failures.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
}

/// An application registration as returned by Graph.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawApplication {
    pub id: String,
    pub app_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub key_credentials: Vec<RawKeyCredential>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password_credentials: Vec<RawPasswordCredential>,
}

/// A certificate credential (`keyCredential`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawKeyCredential {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub key_id: Option<Uuid>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub end_date_time: Option<DateTime<Utc>>,
}

/// A client secret credential (`passwordCredential`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPasswordCredential {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub key_id: Option<Uuid>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub end_date_time: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok()))
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}
