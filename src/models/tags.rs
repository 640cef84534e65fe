//! Metric dimensions attached to every sample.

/// Application client id.
pub const APPLICATION_ID: &str = "ApplicationId";
/// Application display name, falling back to the client id.
pub const APPLICATION: &str = "Application";
/// Credential key id.
pub const KEY_ID: &str = "KeyId";
/// Credential display name, falling back to the key id.
pub const KEY: &str = "Key";

/// Label names of application-level metrics, in tag order.
pub const APPLICATION_LABELS: [&str; 2] = [APPLICATION_ID, APPLICATION];
/// Label names of credential-level metrics, in tag order.
pub const CREDENTIAL_LABELS: [&str; 4] = [APPLICATION_ID, APPLICATION, KEY_ID, KEY];

/// An ordered set of key/value dimensions with unique keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags(Vec<(&'static str, String)>);

impl Tags {
    /// Tags identifying an application.
    pub fn application(client_id: &str, display_name: Option<&str>) -> Self {
        Tags(vec![
            (APPLICATION_ID, client_id.to_string()),
            (APPLICATION, display_name.unwrap_or(client_id).to_string()),
        ])
    }

    /// Application tags followed by the tags identifying one of its credentials.
    ///
    /// The two key sets are disjoint, so the result never holds duplicate keys.
    pub fn credential(application: Tags, key_id: &str, key_name: Option<&str>) -> Self {
        let Tags(mut tags) = application;
        tags.push((KEY_ID, key_id.to_string()));
        tags.push((KEY, key_name.unwrap_or(key_id).to_string()));
        Tags(tags)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.0.iter().map(|(k, _)| *k).collect()
    }

    /// Values in tag order, ready for `with_label_values`.
    pub fn values(&self) -> Vec<&str> {
        self.0.iter().map(|(_, v)| v.as_str()).collect()
    }
}
