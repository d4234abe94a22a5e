//! Weather payloads, shaped field-for-field like the upstream OpenWeatherMap
//! responses so that mock and real data are interchangeable.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Geographic position of the observation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// A single condition descriptor (e.g. `800 / Clear / clear sky / 01d`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Condition {
    /// Upstream condition code
    pub id: u32,
    /// Condition category (e.g. "Clouds")
    pub main: String,
    pub description: String,
    /// Icon code (e.g. "02n")
    pub icon: String,
}

/// Core measurements in the active unit system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Measurements {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// hPa
    pub pressure: u32,
    /// Percent, 0..=100
    pub humidity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Wind {
    pub speed: f64,
    /// Meteorological direction in degrees, 0..360
    #[serde(default)]
    pub deg: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Clouds {
    pub all: u32,
}

/// Country and sun times, epoch seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct SunInfo {
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current-conditions record as returned by `/weather` upstream or the mock
/// synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherRecord {
    pub coord: Coordinates,
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub base: String,
    pub main: Measurements,
    #[serde(default)]
    pub visibility: u32,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub clouds: Clouds,
    /// Observation time, epoch seconds
    pub dt: i64,
    pub sys: SunInfo,
    /// Shift in seconds from UTC
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub cod: u16,
}

impl WeatherRecord {
    /// First condition descriptor, if the upstream sent any
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    /// "City, CC", or just the city name when no country is known
    pub fn location_label(&self) -> String {
        match self.sys.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ForecastMeasurements {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: u32,
}

/// One entry of the upstream `/forecast` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct HourlyForecast {
    pub dt: i64,
    /// "YYYY-MM-DD HH:MM:SS", UTC
    pub dt_txt: String,
    pub main: ForecastMeasurements,
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Wind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DailyTemperature {
    pub day: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DailyForecast {
    pub dt: i64,
    pub temp: DailyTemperature,
    pub weather: Vec<Condition>,
}

/// Hourly list plus an optional pre-aggregated daily list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Forecast {
    pub list: Vec<HourlyForecast>,
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct UvReading {
    pub value: f64,
}

/// Air-quality estimate; `index` is 0 (good) through 4 (very poor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct AirQuality {
    pub index: u8,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_upstream_payload() {
        let payload = serde_json::json!({
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "base": "stations",
            "main": {"temp": 14.2, "feels_like": 13.6, "temp_min": 12.9, "temp_max": 15.3, "pressure": 1012, "humidity": 77},
            "visibility": 10000,
            "wind": {"speed": 4.63, "deg": 240},
            "clouds": {"all": 75},
            "dt": 1_700_000_000,
            "sys": {"type": 2, "id": 2075535, "country": "GB", "sunrise": 1_699_975_000, "sunset": 1_700_008_000},
            "timezone": 0,
            "id": 2643743,
            "name": "London",
            "cod": 200
        });

        let record: WeatherRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(record.name, "London");
        assert_eq!(record.main.humidity, 77);
        assert_eq!(record.primary_condition().unwrap().icon, "04d");
        assert_eq!(record.location_label(), "London, GB");
    }

    #[test]
    fn test_location_label_without_country() {
        let payload = serde_json::json!({
            "coord": {"lon": 0.0, "lat": 0.0},
            "weather": [],
            "main": {"temp": 1.0, "feels_like": 1.0, "temp_min": 0.0, "temp_max": 2.0, "pressure": 1000, "humidity": 50},
            "dt": 0,
            "sys": {"sunrise": 0, "sunset": 1},
            "name": "Nowhere"
        });

        let record: WeatherRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(record.location_label(), "Nowhere");
        assert!(record.primary_condition().is_none());
    }
}
