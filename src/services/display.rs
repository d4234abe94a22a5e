//! Shapes weather records and forecasts into a [`WeatherView`].
//!
//! The shaper is source-agnostic: mock and upstream records go through the same
//! path. Malformed input (missing conditions, empty forecast) yields a
//! [`RenderError`] instead of a panic so callers can show a recoverable error.

use crate::models::{
    AirQuality, Condition, DailyCard, DailyForecast, Forecast, HourlyCard, HourlyForecast,
    UvReading, WeatherRecord, WeatherView,
};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const HOURLY_CARDS: usize = 6;
pub const DAILY_CARDS: usize = 5;
pub const FALLBACK_ICON: &str = "cloud";
const METERS_PER_MILE: f64 = 1609.34;
const UV_SCALE_MAX: f64 = 11.0;
/// Upstream forecast lists carry one entry every three hours
const ENTRIES_PER_DAY: usize = 8;
const MAX_FORECAST_ENTRIES: usize = 40;

const AIR_QUALITY_CATEGORIES: [&str; 5] = ["Good", "Fair", "Moderate", "Poor", "Very Poor"];
const AIR_QUALITY_COLORS: [&str; 5] = ["#10b981", "#f59e0b", "#f59e0b", "#ef4444", "#dc2626"];
const AIR_QUALITY_UNKNOWN_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "C",
            UnitSystem::Imperial => "F",
        }
    }

    pub fn wind_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => " m/s",
            UnitSystem::Imperial => " mph",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            other => Err(format!("unknown unit system \"{other}\"")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("current conditions are missing")]
    MissingConditions,
    #[error("hourly forecast is empty")]
    EmptyHourly,
    #[error("hourly entry {0} has no conditions")]
    HourlyMissingConditions(usize),
    #[error("daily entry {0} has no conditions")]
    DailyMissingConditions(usize),
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

/// Viewer-specific rendering choices
#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions {
    pub units: UnitSystem,
    /// Offset of the viewer's local time from UTC
    pub utc_offset: FixedOffset,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            units: UnitSystem::Metric,
            utc_offset: utc(),
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Map an upstream icon code to an icon name, `cloud` when unmapped
pub fn icon_for(code: &str) -> &'static str {
    match code {
        "01d" => "sun",
        "01n" => "moon",
        "02d" => "cloud-sun",
        "02n" => "cloud-moon",
        "03d" | "03n" | "04d" | "04n" => "cloud",
        "09d" | "09n" => "cloud-rain",
        "10d" => "cloud-sun-rain",
        "10n" => "cloud-moon-rain",
        "11d" | "11n" => "bolt",
        "13d" | "13n" => "snowflake",
        "50d" | "50n" => "smog",
        _ => FALLBACK_ICON,
    }
}

/// First character upper case, the rest lower case
pub fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// UV label and advice. Boundary values resolve to the lower band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvBand {
    pub label: &'static str,
    pub advice: &'static str,
}

pub fn uv_band(uv: f64) -> UvBand {
    let (label, advice) = if uv <= 2.0 {
        ("Low", "No protection needed")
    } else if uv <= 5.0 {
        ("Moderate", "Wear sunscreen")
    } else if uv <= 7.0 {
        ("High", "Seek shade during midday")
    } else if uv <= 10.0 {
        ("Very High", "Extra protection needed")
    } else {
        ("Extreme", "Avoid being outside")
    };
    UvBand { label, advice }
}

pub fn air_quality_band(index: u8) -> &'static str {
    AIR_QUALITY_CATEGORIES
        .get(usize::from(index))
        .copied()
        .unwrap_or("Unknown")
}

pub fn air_quality_color(index: u8) -> &'static str {
    AIR_QUALITY_COLORS
        .get(usize::from(index))
        .copied()
        .unwrap_or(AIR_QUALITY_UNKNOWN_COLOR)
}

/// Miles with one decimal for imperial, native meters otherwise
pub fn format_visibility(meters: u32, units: UnitSystem) -> String {
    match units {
        UnitSystem::Imperial => format!("{:.1} mi", f64::from(meters) / METERS_PER_MILE),
        UnitSystem::Metric => format!("{meters} m"),
    }
}

/// Halves round toward positive infinity, matching browser `Math.round`.
pub fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn local_time(epoch_seconds: i64, offset: FixedOffset) -> Result<DateTime<FixedOffset>, RenderError> {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|t| t.with_timezone(&offset))
        .ok_or(RenderError::InvalidTimestamp(epoch_seconds))
}

/// `HH:MM` in the viewer's local time
pub fn format_clock(epoch_seconds: i64, offset: FixedOffset) -> Result<String, RenderError> {
    Ok(local_time(epoch_seconds, offset)?.format("%H:%M").to_string())
}

/// Build the full view for one lookup
pub fn shape(
    record: &WeatherRecord,
    forecast: &Forecast,
    uv: UvReading,
    air_quality: &AirQuality,
    options: DisplayOptions,
) -> Result<WeatherView, RenderError> {
    let condition = record
        .primary_condition()
        .ok_or(RenderError::MissingConditions)?;
    let units = options.units;
    let band = uv_band(uv.value);

    Ok(WeatherView {
        location: record.location_label(),
        temperature: round_display(record.main.temp),
        feels_like: round_display(record.main.feels_like),
        temp_unit: units.temperature_unit().to_string(),
        icon: icon_for(&condition.icon).to_string(),
        description: sentence_case(&condition.description),
        humidity: format!("{}%", record.main.humidity),
        wind: format!("{}{}", round_display(record.wind.speed), units.wind_unit()),
        visibility: format_visibility(record.visibility, units),
        pressure: format!("{} hPa", record.main.pressure),
        sunrise: format_clock(record.sys.sunrise, options.utc_offset)?,
        sunset: format_clock(record.sys.sunset, options.utc_offset)?,
        uv_index: uv.value,
        uv_percentage: (uv.value / UV_SCALE_MAX * 100.0).clamp(0.0, 100.0),
        uv_band: band.label.to_string(),
        uv_advice: band.advice.to_string(),
        air_quality_index: air_quality.index,
        air_quality: air_quality_band(air_quality.index).to_string(),
        air_quality_color: air_quality_color(air_quality.index).to_string(),
        hourly: shape_hourly(&forecast.list, options.utc_offset)?,
        daily: shape_daily(forecast, options.utc_offset)?,
    })
}

fn first_condition(weather: &[Condition]) -> Option<&Condition> {
    weather.first()
}

/// First [`HOURLY_CARDS`] entries of the hourly list
pub fn shape_hourly(
    entries: &[HourlyForecast],
    offset: FixedOffset,
) -> Result<Vec<HourlyCard>, RenderError> {
    if entries.is_empty() {
        return Err(RenderError::EmptyHourly);
    }

    entries
        .iter()
        .take(HOURLY_CARDS)
        .enumerate()
        .map(|(i, entry)| {
            let condition =
                first_condition(&entry.weather).ok_or(RenderError::HourlyMissingConditions(i))?;
            let time = local_time(entry.dt, offset)?;
            Ok(HourlyCard {
                time: format!("{}:00", time.format("%-H")),
                temperature: round_display(entry.main.temp),
                icon: icon_for(&condition.icon).to_string(),
                description: sentence_case(&condition.description),
            })
        })
        .collect()
}

/// Daily cards from the `daily` list, or derived from the three-hourly list
/// when the source has no daily aggregation. Derived cards take day, icon and
/// description from every 8th entry (index below 40) and high/low from that
/// entry's 24-hour block.
pub fn shape_daily(forecast: &Forecast, offset: FixedOffset) -> Result<Vec<DailyCard>, RenderError> {
    if !forecast.daily.is_empty() {
        return forecast
            .daily
            .iter()
            .take(DAILY_CARDS)
            .enumerate()
            .map(|(i, day)| daily_card(i, day, offset))
            .collect();
    }

    if forecast.list.is_empty() {
        return Err(RenderError::EmptyHourly);
    }

    let limit = forecast.list.len().min(MAX_FORECAST_ENTRIES);
    forecast.list[..limit]
        .chunks(ENTRIES_PER_DAY)
        .take(DAILY_CARDS)
        .enumerate()
        .map(|(i, samples)| {
            let first = &samples[0];
            let condition =
                first_condition(&first.weather).ok_or(RenderError::DailyMissingConditions(i))?;
            let (low, high) = samples.iter().fold((f64::MAX, f64::MIN), |(lo, hi), s| {
                (lo.min(s.main.temp), hi.max(s.main.temp))
            });
            Ok(DailyCard {
                day: local_time(first.dt, offset)?.format("%a").to_string(),
                high: round_display(high),
                low: round_display(low),
                icon: icon_for(&condition.icon).to_string(),
                description: sentence_case(&condition.description),
            })
        })
        .collect()
}

fn daily_card(i: usize, day: &DailyForecast, offset: FixedOffset) -> Result<DailyCard, RenderError> {
    let condition = first_condition(&day.weather).ok_or(RenderError::DailyMissingConditions(i))?;
    Ok(DailyCard {
        day: local_time(day.dt, offset)?.format("%a").to_string(),
        high: round_display(day.temp.max),
        low: round_display(day.temp.min),
        icon: icon_for(&condition.icon).to_string(),
        description: sentence_case(&condition.description),
    })
}
