//! API request/response envelopes for standard endpoints.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
    /// "mock" or "upstream"
    pub weather_source: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Query parameters shared by the weather endpoints
#[derive(Clone, Debug, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherQuery {
    /// City name (e.g. "London")
    pub city: Option<String>,
    /// "metric" (default) or "imperial"
    pub units: Option<String>,
}

/// Success envelope: `{"data": ...}`
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Failure envelope: `{"message": ...}`
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct ErrorResponse {
    pub message: String,
}
