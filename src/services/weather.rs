//! Weather service: serves current conditions, forecasts, UV and air quality
//! either from the OpenWeatherMap API or from the deterministic mock.

use crate::{
    config::WeatherConfig,
    models::{AirQuality, Forecast, UvReading, WeatherRecord},
    services::{display::UnitSystem, display::air_quality_band, mock_weather},
};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use url::Url;

/// Failures talking to the weather source. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("city \"{0}\" not found")]
    NotFound(String),
    #[error("weather API rate limit or quota exceeded")]
    RateLimited,
    #[error("weather API request timed out")]
    Timeout,
    #[error("weather API request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("weather API returned status {0}")]
    UpstreamStatus(u16),
    #[error("failed to parse weather data: {0}")]
    Decode(String),
    #[error("weather API key is not configured")]
    MissingApiKey,
}

impl WeatherError {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::NotFound(_) => "not_found",
            WeatherError::RateLimited => "rate_limited",
            WeatherError::Timeout => "timeout",
            WeatherError::Network(_) => "network",
            WeatherError::UpstreamStatus(_) => "upstream_status",
            WeatherError::Decode(_) => "decode",
            WeatherError::MissingApiKey => "missing_api_key",
        }
    }
}

/// Upstream `/air_pollution` payload; `aqi` is 1 (good) through 5 (very poor)
#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AirPollutionIndex,
}

#[derive(Debug, Deserialize)]
struct AirPollutionIndex {
    aqi: u8,
}

#[derive(Clone)]
struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Clone)]
enum WeatherSource {
    Mock,
    Upstream(OpenWeatherClient),
}

/// Weather lookups against the configured source
#[derive(Clone)]
pub struct WeatherService {
    source: WeatherSource,
}

impl WeatherService {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        if config.mock {
            return Ok(Self::mock());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            source: WeatherSource::Upstream(OpenWeatherClient {
                client,
                api_key: config.api_key.clone(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    pub fn mock() -> Self {
        Self {
            source: WeatherSource::Mock,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.source, WeatherSource::Mock)
    }

    pub fn source_label(&self) -> &'static str {
        if self.is_mock() { "mock" } else { "upstream" }
    }

    /// Current conditions for `city`. The mock ignores `units` and always
    /// reports metric values.
    pub async fn current(&self, city: &str, units: UnitSystem) -> Result<WeatherRecord, WeatherError> {
        match &self.source {
            WeatherSource::Mock => Ok(mock_weather::current_for_city(city, Utc::now().timestamp())),
            WeatherSource::Upstream(upstream) => upstream.by_city("weather", city, units).await,
        }
    }

    pub async fn forecast(&self, city: &str, units: UnitSystem) -> Result<Forecast, WeatherError> {
        match &self.source {
            WeatherSource::Mock => Ok(mock_weather::forecast_for_city(city, Utc::now().timestamp())),
            WeatherSource::Upstream(upstream) => upstream.by_city("forecast", city, units).await,
        }
    }

    /// UV index at the record's coordinates
    pub async fn uv(&self, record: &WeatherRecord) -> Result<UvReading, WeatherError> {
        match &self.source {
            WeatherSource::Mock => Ok(mock_weather::uv_for_city(&record.name)),
            WeatherSource::Upstream(upstream) => upstream.by_coords("uvi", record).await,
        }
    }

    /// Air quality at the record's coordinates, normalized to the 0..=4 index
    pub async fn air_quality(&self, record: &WeatherRecord) -> Result<AirQuality, WeatherError> {
        match &self.source {
            WeatherSource::Mock => Ok(mock_weather::air_quality_for_city(&record.name)),
            WeatherSource::Upstream(upstream) => {
                let response: AirPollutionResponse =
                    upstream.by_coords("air_pollution", record).await?;
                let aqi = response
                    .list
                    .first()
                    .map(|entry| entry.main.aqi)
                    .ok_or_else(|| WeatherError::Decode("air pollution list is empty".to_string()))?;
                let index = aqi.saturating_sub(1);
                Ok(AirQuality {
                    index,
                    category: air_quality_band(index).to_string(),
                })
            }
        }
    }
}

impl OpenWeatherClient {
    async fn by_city<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        units: UnitSystem,
    ) -> Result<T, WeatherError> {
        let params = [("q", city.to_string()), ("units", units.to_string()), ("lang", "en".to_string())];
        self.fetch(endpoint, &params, city).await
    }

    async fn by_coords<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        record: &WeatherRecord,
    ) -> Result<T, WeatherError> {
        let params = [
            ("lat", record.coord.lat.to_string()),
            ("lon", record.coord.lon.to_string()),
        ];
        self.fetch(endpoint, &params, &record.name).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        city: &str,
    ) -> Result<T, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = Url::parse_with_params(
            &format!("{}/{}", self.base_url, endpoint),
            params
                .iter()
                .map(|(k, v)| (*k, v.as_str()))
                .chain(std::iter::once(("appid", api_key))),
        )
        .map_err(|e| WeatherError::Decode(format!("invalid weather API URL: {e}")))?;

        tracing::debug!(target: "weather", endpoint, city, "Calling weather API");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                WeatherError::Timeout
            } else {
                WeatherError::Network(e)
            }
        })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(WeatherError::NotFound(city.to_string())),
            StatusCode::TOO_MANY_REQUESTS => return Err(WeatherError::RateLimited),
            status => {
                tracing::warn!(target: "weather", endpoint, city, status = status.as_u16(), "Weather API error status");
                return Err(WeatherError::UpstreamStatus(status.as_u16()));
            }
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Decode(e.to_string()))
    }
}
