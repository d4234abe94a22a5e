//! City name validation and sanitizing.

use crate::client::errors::ClientError;
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_CITY_LENGTH: usize = 2;
pub const MAX_CITY_LENGTH: usize = 50;

static DISALLOWED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[^\w\s-]").ok());
static WHITESPACE_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());

/// Validate raw input and return the cleaned city name.
///
/// Length is checked on the trimmed input before sanitizing.
pub fn validate_city(raw: &str) -> Result<String, ClientError> {
    let city = raw.trim();
    if city.is_empty() {
        return Err(ClientError::Validation("Please enter a city name".to_string()));
    }

    let length = city.chars().count();
    if !(MIN_CITY_LENGTH..=MAX_CITY_LENGTH).contains(&length) {
        return Err(ClientError::Validation(format!(
            "City name must be between {MIN_CITY_LENGTH} and {MAX_CITY_LENGTH} characters"
        )));
    }

    let clean = sanitize(city);
    if clean.is_empty() {
        return Err(ClientError::Validation("Please enter a city name".to_string()));
    }
    Ok(clean)
}

/// Drop everything but word characters, whitespace and `-`, then collapse
/// whitespace runs to one space.
pub fn sanitize(city: &str) -> String {
    let (Some(disallowed), Some(whitespace)) = (DISALLOWED.as_ref(), WHITESPACE_RUN.as_ref()) else {
        return city.trim().to_string();
    };

    let stripped = disallowed.replace_all(city, "");
    whitespace.replace_all(&stripped, " ").trim().to_string()
}
