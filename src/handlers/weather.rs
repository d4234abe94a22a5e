//! Weather endpoint handlers.

use crate::{
    error::ApiError,
    middleware::extract_identity,
    models::{DataResponse, Forecast, SearchRecord, WeatherQuery, WeatherRecord, WeatherView},
    services::{
        display::{self, DisplayOptions, UnitSystem},
        history::spawn_search_write,
        rate_limit::enforce_rate_limit,
    },
    state::AppState,
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Validated lookup parameters
struct Lookup {
    city: String,
    units: UnitSystem,
}

impl Lookup {
    fn from_query(query: &WeatherQuery) -> Result<Self, ApiError> {
        let city = query
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ApiError::bad_request("city query param required"))?;

        let units = match query.units.as_deref() {
            None | Some("") => UnitSystem::default(),
            Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        };

        Ok(Self {
            city: city.to_string(),
            units,
        })
    }
}

async fn fetch_current(state: &AppState, lookup: &Lookup) -> Result<WeatherRecord, ApiError> {
    let source = state.weather.source_label();

    match state.weather.current(&lookup.city, lookup.units).await {
        Ok(record) => {
            state.metrics.record_weather_lookup(source, "success");
            Ok(record)
        }
        Err(e) => {
            tracing::warn!(target: "weather", city = %lookup.city, source, error = %e, "Weather lookup failed");
            state.metrics.record_weather_lookup(source, e.kind());
            Err(e.into())
        }
    }
}

/// Save the lookup on a detached task, attributed to the caller when authenticated
fn record_search(req: &HttpRequest, state: &AppState, lookup: &Lookup, record: &WeatherRecord) {
    let owner = extract_identity(req).map(|identity| identity.user_id);
    spawn_search_write(
        state.searches.clone(),
        SearchRecord::new(owner, &lookup.city, record.clone()),
        Some(state.metrics.clone()),
    );
}

/// Current weather endpoint
///
/// Proxies the upstream current-conditions payload (or the mock) unchanged and
/// records the lookup in search history without waiting for the write.
#[api_v2_operation(
    summary = "Current Weather",
    description = "Returns current conditions for a city in the upstream OpenWeatherMap format, wrapped in {\"data\": ...}. The lookup is saved to search history in the background; a bearer token, when valid, attributes it to the caller.",
    tags("Weather"),
    parameters(
        ("city" = String, Query, description = "City name (e.g., London)"),
        ("units" = Option<String>, Query, description = "metric (default) or imperial"),
    ),
    responses(
        (status = 200, description = "Successful response", body = DataResponse<WeatherRecord>),
        (status = 400, description = "Missing city or unknown unit system"),
        (status = 404, description = "City not found"),
        (status = 429, description = "Too Many Requests"),
        (status = 500, description = "Weather API key not configured"),
        (status = 502, description = "Weather service unavailable")
    )
)]
pub async fn current_weather(
    req: HttpRequest,
    query: web::Query<WeatherQuery>,
    state: web::Data<AppState>,
) -> Result<web::Json<DataResponse<WeatherRecord>>, Error> {
    enforce_rate_limit(&req, &state.limiter)?;
    let lookup = Lookup::from_query(&query)?;

    let record = fetch_current(&state, &lookup).await?;
    record_search(&req, &state, &lookup, &record);

    Ok(web::Json(DataResponse::new(record)))
}

/// Forecast endpoint
#[api_v2_operation(
    summary = "Weather Forecast",
    description = "Returns the hourly forecast list for a city, plus a daily list when the source provides one.",
    tags("Weather"),
    parameters(
        ("city" = String, Query, description = "City name (e.g., London)"),
        ("units" = Option<String>, Query, description = "metric (default) or imperial"),
    ),
    responses(
        (status = 200, description = "Successful response", body = DataResponse<Forecast>),
        (status = 400, description = "Missing city or unknown unit system"),
        (status = 404, description = "City not found"),
        (status = 429, description = "Too Many Requests"),
        (status = 502, description = "Weather service unavailable")
    )
)]
pub async fn forecast(
    req: HttpRequest,
    query: web::Query<WeatherQuery>,
    state: web::Data<AppState>,
) -> Result<web::Json<DataResponse<Forecast>>, Error> {
    enforce_rate_limit(&req, &state.limiter)?;
    let lookup = Lookup::from_query(&query)?;

    let forecast = state
        .weather
        .forecast(&lookup.city, lookup.units)
        .await
        .map_err(ApiError::from)?;

    Ok(web::Json(DataResponse::new(forecast)))
}

/// Display-ready weather view
///
/// Combines current conditions, forecast, UV and air quality into the flat
/// view the clients render. Times are formatted in UTC. Like the current
/// weather endpoint, the lookup is saved to search history.
#[api_v2_operation(
    summary = "Weather View",
    description = "Returns display-ready values (rounded temperatures, icon names, UV and air-quality bands, hourly and daily cards) for a city. The lookup is saved to search history in the background.",
    tags("Weather"),
    parameters(
        ("city" = String, Query, description = "City name (e.g., London)"),
        ("units" = Option<String>, Query, description = "metric (default) or imperial"),
    ),
    responses(
        (status = 200, description = "Successful response", body = DataResponse<WeatherView>),
        (status = 400, description = "Missing city or unknown unit system"),
        (status = 404, description = "City not found"),
        (status = 429, description = "Too Many Requests"),
        (status = 502, description = "Weather service unavailable or data cannot be rendered")
    )
)]
pub async fn weather_view(
    req: HttpRequest,
    query: web::Query<WeatherQuery>,
    state: web::Data<AppState>,
) -> Result<web::Json<DataResponse<WeatherView>>, Error> {
    enforce_rate_limit(&req, &state.limiter)?;
    let lookup = Lookup::from_query(&query)?;

    let record = fetch_current(&state, &lookup).await?;
    record_search(&req, &state, &lookup, &record);
    let forecast = state
        .weather
        .forecast(&lookup.city, lookup.units)
        .await
        .map_err(ApiError::from)?;
    let uv = state.weather.uv(&record).await.map_err(ApiError::from)?;
    let air_quality = state
        .weather
        .air_quality(&record)
        .await
        .map_err(ApiError::from)?;

    let options = DisplayOptions {
        units: lookup.units,
        ..DisplayOptions::default()
    };
    let view = display::shape(&record, &forecast, uv, &air_quality, options).map_err(|e| {
        tracing::warn!(target: "weather", city = %lookup.city, error = %e, "Cannot render weather data");
        ApiError::from(e)
    })?;

    Ok(web::Json(DataResponse::new(view)))
}
