use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, info};

use super::providers::{ApplicationSource, Page};
use super::token::acquire_token;
use crate::config::GraphConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::models::graph::{APPLICATION_SELECT, ODataError, ODataPage};
use crate::models::RawApplication;

/// Lists application registrations through Microsoft Graph.
pub struct GraphApplicationSource {
    config: GraphConfig,
    http_client: reqwest::Client,
}

impl GraphApplicationSource {
    pub fn new(config: &GraphConfig) -> MonitorResult<Self> {
        info!(
            "Creating Graph application source for tenant '{}' at '{}'",
            config.tenant_id, config.graph_url
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()
            .map_err(|e| MonitorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config: config.clone(),
            http_client,
        })
    }

    /// GETs one page. Returns `None` for 204/404 when `allow_empty` is set.
    async fn fetch(&self, url: &str, allow_empty: bool) -> MonitorResult<Option<Page>> {
        let token = acquire_token(self.config.clone())
            .await
            .map_err(MonitorError::Auth)?;

        debug!("Fetching applications page: {}", url);
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await?;

        let status = response.status();
        if allow_empty && matches!(status, StatusCode::NO_CONTENT | StatusCode::NOT_FOUND) {
            debug!("Graph returned {} for the applications listing", status);
            return Ok(None);
        }

        let body = response.text().await?;
        if status.is_success() {
            let page: ODataPage<RawApplication> = serde_json::from_str(&body)?;
            debug!(
                "Received {} applications, more pages: {}",
                page.value.len(),
                page.next_link.is_some()
            );
            return Ok(Some(Page {
                applications: page.value,
                next_link: page.next_link,
            }));
        }

        Err(graph_error(status, &body))
    }
}

fn graph_error(status: StatusCode, body: &str) -> MonitorError {
    match serde_json::from_str::<ODataError>(body) {
        Ok(odata_error) => MonitorError::Graph {
            status: status.as_u16(),
            code: odata_error.error.code,
            message: odata_error.error.message,
        },
        Err(_) => MonitorError::Graph {
            status: status.as_u16(),
            code: status.to_string(),
            message: body.to_string(),
        },
    }
}

#[async_trait::async_trait]
impl ApplicationSource for GraphApplicationSource {
    fn get_name(&self) -> &str {
        "microsoft-graph"
    }

    async fn first_page(&self) -> MonitorResult<Option<Page>> {
        let url = self.config.applications_url(APPLICATION_SELECT);
        self.fetch(&url, true).await
    }

    async fn next_page(&self, next_link: &str) -> MonitorResult<Page> {
        Ok(self.fetch(next_link, false).await?.unwrap_or_default())
    }
}
