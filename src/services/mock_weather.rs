//! Deterministic mock weather, used in tests and when `MOCK_WEATHER=true`.
//!
//! Everything is derived from a seed computed from the city name, so the same
//! city always gets the same weather profile. Only the timestamps follow the
//! clock passed in by the caller.
//!
//! The seed is the sum of the name's UTF-16 code units, which makes it
//! independent of character order: anagrams ("Rome", "More") share a profile.

use crate::{
    models::{
        AirQuality, Clouds, Condition, Coordinates, DailyForecast, DailyTemperature, Forecast,
        ForecastMeasurements, HourlyForecast, Measurements, SunInfo, UvReading, WeatherRecord,
        Wind,
    },
    services::{display::air_quality_band, rng::SeededRandom},
};
use chrono::DateTime;

/// `(code, category, icon, forecast description)`
const CONDITIONS: [(u32, &str, &str, &str); 4] = [
    (800, "Clear", "01d", "clear sky"),
    (801, "Clouds", "02d", "few clouds"),
    (500, "Rain", "10d", "light rain"),
    (600, "Snow", "13d", "light snow"),
];

const FORECAST_STREAM: i64 = 7_919;
const UV_STREAM: i64 = 104_729;
const AIR_QUALITY_STREAM: i64 = 1_299_709;

pub const HOURLY_ENTRIES: usize = 6;
pub const DAILY_ENTRIES: usize = 5;

/// Sum of UTF-16 code units of the city name
pub fn seed_for_city(city: &str) -> i64 {
    city.encode_utf16().map(i64::from).sum()
}

fn pick_condition(rng: &mut SeededRandom) -> (u32, &'static str, &'static str, &'static str) {
    CONDITIONS[rng.next_below(CONDITIONS.len() as u32) as usize]
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Synthesize a current-conditions record for `city`, observed at `now`
/// (epoch seconds).
pub fn current_for_city(city: &str, now: i64) -> WeatherRecord {
    let seed = seed_for_city(city);
    let mut rng = SeededRandom::new(seed);

    // Draw order matters: it fixes which value each city gets.
    let base_temp = 10 + i64::from(rng.next_below(20));
    let variation = i64::from(rng.next_below(6)) - 2;
    let (code, category, icon, _) = pick_condition(&mut rng);
    let pressure = 1008 + rng.next_below(8);
    let humidity = 40 + rng.next_below(50);
    let wind_speed = round_one_decimal(rng.next_f64() * 8.0);
    let wind_deg = rng.next_below(360);
    let cloudiness = rng.next_below(100);

    let temp = (base_temp + variation) as f64;

    WeatherRecord {
        coord: Coordinates { lon: 0.0, lat: 0.0 },
        weather: vec![Condition {
            id: code,
            main: category.to_string(),
            description: format!("{category} in {city}"),
            icon: icon.to_string(),
        }],
        base: "stations".to_string(),
        main: Measurements {
            temp,
            feels_like: temp - 1.0,
            temp_min: temp - 2.0,
            temp_max: temp + 2.0,
            pressure,
            humidity,
        },
        visibility: 10_000,
        wind: Wind {
            speed: wind_speed,
            deg: wind_deg,
        },
        clouds: Clouds { all: cloudiness },
        dt: now,
        sys: SunInfo {
            country: Some("XX".to_string()),
            sunrise: now - 3600,
            sunset: now + 3600,
        },
        timezone: 0,
        id: seed,
        name: city.to_string(),
        cod: 200,
    }
}

/// Hourly entries one hour apart and daily entries one day apart, centred on
/// the temperature of [`current_for_city`].
pub fn forecast_for_city(city: &str, now: i64) -> Forecast {
    let current = current_for_city(city, now);
    let base_temp = current.main.temp;
    let mut rng = SeededRandom::new(seed_for_city(city) + FORECAST_STREAM);

    let list = (1..=HOURLY_ENTRIES as i64)
        .map(|hour| {
            let dt = now + hour * 3600;
            let temp = base_temp + f64::from(rng.next_below(5)) - 2.0;
            let (code, category, icon, description) = pick_condition(&mut rng);
            HourlyForecast {
                dt,
                dt_txt: format_forecast_time(dt),
                main: ForecastMeasurements {
                    temp,
                    feels_like: temp - 1.0,
                    humidity: current.main.humidity,
                },
                weather: vec![Condition {
                    id: code,
                    main: category.to_string(),
                    description: description.to_string(),
                    icon: icon.to_string(),
                }],
                wind: current.wind.clone(),
            }
        })
        .collect();

    let daily = (0..DAILY_ENTRIES as i64)
        .map(|day| {
            let day_temp = base_temp + f64::from(rng.next_below(7)) - 3.0;
            let spread_low = f64::from(2 + rng.next_below(3));
            let spread_high = f64::from(2 + rng.next_below(3));
            let (code, category, icon, description) = pick_condition(&mut rng);
            DailyForecast {
                dt: now + day * 86_400,
                temp: DailyTemperature {
                    day: day_temp,
                    min: day_temp - spread_low,
                    max: day_temp + spread_high,
                },
                weather: vec![Condition {
                    id: code,
                    main: category.to_string(),
                    description: description.to_string(),
                    icon: icon.to_string(),
                }],
            }
        })
        .collect();

    Forecast { list, daily }
}

/// UV index in `0..=11`
pub fn uv_for_city(city: &str) -> UvReading {
    let mut rng = SeededRandom::new(seed_for_city(city) + UV_STREAM);
    UvReading {
        value: f64::from(rng.next_below(12)),
    }
}

/// Air-quality index in `0..=4`
pub fn air_quality_for_city(city: &str) -> AirQuality {
    let mut rng = SeededRandom::new(seed_for_city(city) + AIR_QUALITY_STREAM);
    let index = rng.next_below(5) as u8;
    AirQuality {
        index,
        category: air_quality_band(index).to_string(),
    }
}

fn format_forecast_time(epoch_seconds: i64) -> String {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    const CITIES: &[&str] = &[
        "London", "Paris", "New York", "Tokyo", "Sydney", "São Paulo", "Zürich", "A", "Test",
        "Llanfairpwllgwyngyll", "東京",
    ];

    #[test]
    fn test_record_invariants_hold_for_all_cities() {
        for city in CITIES {
            let record = current_for_city(city, NOW);
            let main = &record.main;

            assert!(main.temp_min <= main.temp && main.temp <= main.temp_max, "{city}");
            assert!((40..90).contains(&main.humidity), "{city}: humidity {}", main.humidity);
            assert!((1008..1016).contains(&main.pressure), "{city}");
            assert!(record.wind.deg < 360, "{city}");
            assert!((0.0..8.0).contains(&record.wind.speed) || record.wind.speed == 8.0);
            assert!(record.sys.sunrise < record.sys.sunset, "{city}");
            assert!((8.0..=32.0).contains(&main.temp), "{city}: temp {}", main.temp);
            assert_eq!(record.weather.len(), 1);
        }
    }

    #[test]
    fn test_same_city_same_profile_different_clock() {
        let first = current_for_city("London", NOW);
        let later = current_for_city("London", NOW + 600);

        assert_eq!(first.main, later.main);
        assert_eq!(first.weather, later.weather);
        assert_eq!(first.wind, later.wind);
        assert_eq!(later.dt, NOW + 600);
        assert_eq!(later.sys.sunrise, NOW + 600 - 3600);
        assert_eq!(later.sys.sunset, NOW + 600 + 3600);
    }

    #[test]
    fn test_record_shape_matches_upstream() {
        let record = current_for_city("Paris", NOW);
        let condition = record.primary_condition().unwrap();

        assert_eq!(record.name, "Paris");
        assert_eq!(record.sys.country.as_deref(), Some("XX"));
        assert_eq!(record.id, seed_for_city("Paris"));
        assert_eq!(record.cod, 200);
        assert_eq!(record.visibility, 10_000);
        assert_eq!(condition.description, format!("{} in Paris", condition.main));
        assert!(["01d", "02d", "10d", "13d"].contains(&condition.icon.as_str()));

        let json = serde_json::to_value(&record).unwrap();
        for key in ["coord", "weather", "main", "wind", "sys", "dt", "name", "visibility"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_seed_is_order_independent() {
        assert_eq!(seed_for_city("Rome"), seed_for_city("More"));
        assert_eq!(
            current_for_city("Rome", NOW).main,
            current_for_city("More", NOW).main
        );
        assert_eq!(seed_for_city("AB"), 65 + 66);
    }

    #[test]
    fn test_forecast_is_deterministic_and_sized() {
        let a = forecast_for_city("Tokyo", NOW);
        let b = forecast_for_city("Tokyo", NOW);

        assert_eq!(a, b);
        assert_eq!(a.list.len(), HOURLY_ENTRIES);
        assert_eq!(a.daily.len(), DAILY_ENTRIES);
        assert_eq!(a.list[0].dt, NOW + 3600);
        assert_eq!(a.list[0].dt_txt, "2023-11-14 23:13:20");
        for day in &a.daily {
            assert!(day.temp.min < day.temp.day && day.temp.day < day.temp.max);
        }
    }

    #[test]
    fn test_uv_and_air_quality_ranges() {
        for city in CITIES {
            let uv = uv_for_city(city);
            assert!((0.0..=11.0).contains(&uv.value));

            let aq = air_quality_for_city(city);
            assert!(aq.index <= 4);
            assert_ne!(aq.category, "Unknown");
        }
    }
}
