use std::ops::Deref;

use super::credential::CredentialRecord;
use super::graph::RawApplication;
use super::tags::Tags;

/// An application registration with its normalized credentials.
///
/// Built fresh from every Graph page and dropped once its metrics are
/// recorded. There is no way to mutate a record after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRecord {
    id: String,
    client_id: String,
    display_name: Option<String>,
    credentials: Vec<CredentialRecord>,
}

impl From<RawApplication> for ApplicationRecord {
    /// Certificates come first, then secrets, each in upstream order.
    fn from(raw: RawApplication) -> Self {
        let certificates = raw
            .key_credentials
            .into_iter()
            .map(CredentialRecord::from_certificate);
        let secrets = raw
            .password_credentials
            .into_iter()
            .map(CredentialRecord::from_secret);

        ApplicationRecord {
            id: raw.id,
            client_id: raw.app_id,
            display_name: raw.display_name,
            credentials: certificates.chain(secrets).collect(),
        }
    }
}

impl ApplicationRecord {
    /// Directory object id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Public application (client) id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    /// Credentials paired with a borrowed view of this application.
    pub fn credentials(&self) -> impl Iterator<Item = ApplicationCredential<'_>> {
        self.credentials
            .iter()
            .map(move |credential| ApplicationCredential {
                application: self,
                credential,
            })
    }

    pub fn tags(&self) -> Tags {
        Tags::application(&self.client_id, self.display_name())
    }
}

/// A credential together with the application that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ApplicationCredential<'a> {
    application: &'a ApplicationRecord,
    credential: &'a CredentialRecord,
}

impl<'a> ApplicationCredential<'a> {
    pub fn application(&self) -> &'a ApplicationRecord {
        self.application
    }

    pub fn record(&self) -> &'a CredentialRecord {
        self.credential
    }

    pub fn tags(&self) -> Tags {
        Tags::credential(
            self.application.tags(),
            self.credential.key_id(),
            self.credential.key_name(),
        )
    }
}

impl Deref for ApplicationCredential<'_> {
    type Target = CredentialRecord;

    fn deref(&self) -> &CredentialRecord {
        self.credential
    }
}
