use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::graph::GraphConfig;
use super::logging::LoggingConfig;
use super::metrics::MetricsConfig;
use super::scan::ScanConfig;
use crate::error::{MonitorError, MonitorResult};

/// Prefix of environment variables overriding the config file.
///
/// Nested keys are separated by `__`, e.g. `CREDMON_GRAPH__CLIENT_SECRET`.
pub const ENV_PREFIX: &str = "CREDMON_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct ConfigV1 {
    pub graph: GraphConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigV1 {
    /// Rejects values that deserialize fine but cannot work.
    pub fn validate(&self) -> MonitorResult<()> {
        if self.graph.tenant_id.trim().is_empty() {
            return Err(MonitorError::Config("graph.tenant_id must not be empty".into()));
        }
        if self.graph.client_id.trim().is_empty() {
            return Err(MonitorError::Config("graph.client_id must not be empty".into()));
        }
        if self.scan.interval_in_seconds == Some(0) {
            return Err(MonitorError::Config(
                "scan.interval_in_seconds must be greater than zero".into(),
            ));
        }
        if matches!(self.metrics, MetricsConfig::Http { .. })
            && self.scan.interval_in_seconds.is_none()
        {
            return Err(MonitorError::Config(
                "metrics.exporter 'http' requires scan.interval_in_seconds".into(),
            ));
        }
        if self.graph.page_size == Some(0) {
            return Err(MonitorError::Config("graph.page_size must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Load config from a YAML file, with `CREDMON_` environment variables on top.
pub fn load_config(path: impl AsRef<Path>) -> MonitorResult<ConfigV1> {
    let figment = Figment::new()
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    extract(figment)
}

/// Parse config from a YAML string. Environment variables are not consulted.
pub fn parse_config(yaml: &str) -> MonitorResult<ConfigV1> {
    extract(Figment::new().merge(Yaml::string(yaml)))
}

fn extract(figment: Figment) -> MonitorResult<ConfigV1> {
    let config = figment
        .extract::<Config>()
        .map_err(|e| MonitorError::Config(e.to_string()))?;

    // handle configuration migration between versions here when necessary
    let config = match config {
        Config::ConfigV1(c) => c,
    };
    config.validate()?;
    Ok(config)
}

/// Render the JSON schema for the configuration.
pub fn config_schema() -> MonitorResult<String> {
    let schema = schema_for!(Config);
    Ok(serde_json::to_string_pretty(&schema)?)
}
