use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The metrics exporter. We differentiate them via an "exporter" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Default, PartialEq, Eq)]
#[serde(tag = "exporter")]
pub enum MetricsConfig {
    /// Print the metrics to stdout after every scan.
    #[default]
    #[serde(rename = "console")]
    Console,
    /// Push the metrics to a Prometheus push gateway after every scan.
    #[serde(rename = "pushgateway")]
    PushGateway {
        push_address: String,
        #[serde(default = "default_job")]
        job: String,
    },
    /// Serve `/metrics` for scraping.
    #[serde(rename = "http")]
    Http { bind_address: String },
}

impl MetricsConfig {
    /// The exporter prints the exposition on stdout.
    pub fn writes_to_stdout(&self) -> bool {
        matches!(self, MetricsConfig::Console)
    }
}

fn default_job() -> String {
    "entra_credential_monitor".to_string()
}
