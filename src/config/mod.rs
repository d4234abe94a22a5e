//! Configuration structures and loading utilities.
//!
//! Every section follows the same pattern: a `Default` with the values used in
//! development and a `from_env()` that overrides them from environment variables.

pub mod auth;
pub mod database;
pub mod metrics;
pub mod rate_limit;
pub mod server;
pub mod weather;

pub use auth::*;
pub use database::*;
pub use metrics::*;
pub use rate_limit::*;
pub use server::*;
pub use weather::*;

use std::{env, str::FromStr};

/// Complete application configuration
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub weather: WeatherConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            weather: WeatherConfig::from_env(),
            auth: AuthConfig::from_env(),
            database: DatabaseConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            metrics: MetricsConfig::from_env(),
        }
    }
}

/// Parse an environment variable, ignoring it when unset or malformed
pub(crate) fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read a boolean flag; only "true" (any case) counts as set
pub(crate) fn env_flag(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| v.trim().eq_ignore_ascii_case("true"))
}
