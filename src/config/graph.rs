use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Connection settings for Microsoft Graph.
///
/// The app registration used here needs the `Application.Read.All`
/// application permission.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Hash, PartialEq, Eq)]
pub struct GraphConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_authority_url")]
    pub authority_url: String,
    #[serde(default = "default_graph_url")]
    pub graph_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// `$top` for the applications listing; Graph picks its own page size when unset.
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

impl GraphConfig {
    /// Token endpoint of the tenant.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_url.trim_end_matches('/'),
            self.tenant_id
        )
    }

    /// Scope requested for Graph access tokens.
    pub fn scope(&self) -> String {
        format!("{}/.default", self.graph_url.trim_end_matches('/'))
    }

    /// First page of the applications listing.
    pub fn applications_url(&self, select: &str) -> String {
        let mut url = format!(
            "{}/{}/applications?$select={}",
            self.graph_url.trim_end_matches('/'),
            self.api_version,
            select
        );
        if let Some(top) = self.page_size {
            url.push_str(&format!("&$top={}", top));
        }
        url
    }
}

fn default_authority_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_graph_url() -> String {
    "https://graph.microsoft.com".to_string()
}

fn default_api_version() -> String {
    "v1.0".to_string()
}

fn default_timeout_in_ms() -> u64 {
    30_000
}
