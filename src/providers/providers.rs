use std::sync::Arc;

use super::graph_provider::GraphApplicationSource;
use crate::config::GraphConfig;
use crate::error::MonitorResult;
use crate::models::RawApplication;

/// One page of application registrations.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub applications: Vec<RawApplication>,
    /// Link to the following page; `None` on the last page.
    pub next_link: Option<String>,
}

/// A directory that lists application registrations page by page.
///
/// Retries, if any, are the implementation's business; callers treat every
/// error as final for the current scan.
#[async_trait::async_trait]
pub trait ApplicationSource: Send + Sync {
    fn get_name(&self) -> &str;

    /// Fetches the first page. `None` means the directory returned no data at all.
    async fn first_page(&self) -> MonitorResult<Option<Page>>;

    /// Fetches the page behind a link returned by the previous page.
    async fn next_page(&self, next_link: &str) -> MonitorResult<Page>;
}

/// Create the application source for a Graph config.
pub fn create_application_source(config: &GraphConfig) -> MonitorResult<Arc<dyn ApplicationSource>> {
    Ok(Arc::new(GraphApplicationSource::new(config)?))
}
