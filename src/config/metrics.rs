//! Metrics configuration.

use super::env_flag;

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("METRICS_ENABLED").unwrap_or(true),
        }
    }
}
