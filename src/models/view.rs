//! Display-ready view of a weather lookup.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Flat, render-ready fields derived from a [`crate::models::WeatherRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherView {
    /// "City, CC"
    pub location: String,
    pub temperature: i64,
    pub feels_like: i64,
    /// "C" or "F"
    pub temp_unit: String,
    /// Icon name (e.g. "cloud-sun")
    pub icon: String,
    pub description: String,
    pub humidity: String,
    pub wind: String,
    pub visibility: String,
    pub pressure: String,
    pub sunrise: String,
    pub sunset: String,
    pub uv_index: f64,
    /// Width of the UV bar, 0..=100
    pub uv_percentage: f64,
    pub uv_band: String,
    pub uv_advice: String,
    pub air_quality_index: u8,
    pub air_quality: String,
    /// CSS colour for the air-quality swatch
    pub air_quality_color: String,
    pub hourly: Vec<HourlyCard>,
    pub daily: Vec<DailyCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct HourlyCard {
    /// "14:00"
    pub time: String,
    pub temperature: i64,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DailyCard {
    /// Short weekday name, e.g. "Mon"
    pub day: String,
    pub high: i64,
    pub low: i64,
    pub icon: String,
    pub description: String,
}
