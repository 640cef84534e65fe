use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calculator::DEFAULT_NO_EXPIRY_HORIZON_YEARS;

/// Scheduling and calculation settings for scans.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Seconds between scans. Without it a single scan runs and the process exits.
    #[serde(default)]
    pub interval_in_seconds: Option<u64>,
    /// Years until expiry reported for credentials without an end date.
    #[serde(default = "default_no_expiry_horizon_years")]
    pub no_expiry_horizon_years: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            interval_in_seconds: None,
            no_expiry_horizon_years: default_no_expiry_horizon_years(),
        }
    }
}

fn default_no_expiry_horizon_years() -> u32 {
    DEFAULT_NO_EXPIRY_HORIZON_YEARS
}
