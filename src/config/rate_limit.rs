//! Rate limiting configuration for the weather endpoints.

use super::{env_flag, env_parse};

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests allowed per client per period
    pub max_requests: usize,
    pub period_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            period_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("RATE_LIMIT_ENABLED").unwrap_or(true),
            max_requests: env_parse("RATE_LIMIT_RPM").unwrap_or(100),
            period_seconds: env_parse("RATE_LIMIT_PERIOD").unwrap_or(60),
        }
    }
}
