//! Weather source configuration.

use super::{env_flag, env_parse};
use std::env;

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Where weather data comes from and how long to wait for it
#[derive(Clone, Debug)]
pub struct WeatherConfig {
    /// Serve synthesized data instead of calling upstream
    pub mock: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            mock: false,
            api_key: None,
            base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            timeout_seconds: 5,
        }
    }
}

impl WeatherConfig {
    pub fn mock() -> Self {
        Self {
            mock: true,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        let mock = env_flag("MOCK_WEATHER").unwrap_or(false)
            || env::var("APP_ENV").map(|v| v == "test").unwrap_or(false);

        let api_key = env::var("OPENWEATHER_API_KEY")
            .or_else(|_| env::var("WEATHER_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let base_url = env::var("OPENWEATHER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_OPENWEATHER_BASE_URL.to_string());

        Self {
            mock,
            api_key,
            base_url,
            timeout_seconds: env_parse("WEATHER_TIMEOUT_SECONDS").unwrap_or(5),
        }
    }

    pub fn source_label(&self) -> &'static str {
        if self.mock { "mock" } else { "upstream" }
    }
}
