//! Weather Lookup API - weather proxy, search history and accounts on Actix Web
//!
//! The service fetches current conditions and forecasts from OpenWeatherMap, or
//! synthesizes them deterministically from the city name in mock mode, and
//! shapes them into display-ready views.
//!
//! ## Architecture
//!
//! - `models/` - Upstream weather payloads, view models and request/response envelopes
//! - `handlers/` - HTTP request handlers and the app factory
//! - `middleware/` - Request IDs, metrics, optional bearer authentication
//! - `services/` - Weather sources, mock synthesizer, display shaper, SQLite and
//!   in-memory stores, tokens
//! - `client/` - Client-side session state, recent searches and the backend API client
//! - `config/` - Configuration structures and environment loading
//! - `utils/` - Request introspection helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use weather_lookup_api::{AppConfig, AppState, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let state = AppState::new(AppConfig::from_env()).expect("valid configuration");
//!     let app = create_app(state);
//!     // Configure and run the server
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, MetricsConfig, RateLimitConfig, ServerConfig,
    WeatherConfig,
};
pub use error::ApiError;
pub use handlers::{create_app, create_openapi_spec};
pub use middleware::{Identity, MetricsMiddleware, OptionalAuth, RequestIdMiddleware};
pub use models::{
    DataResponse, ErrorResponse, Forecast, SearchRecord, WeatherQuery, WeatherRecord, WeatherView,
};
pub use services::{
    AppMetrics, Database, InMemorySearchStore, InMemoryUserStore, SearchStore, SimpleRateLimiter,
    SqliteSearchStore, SqliteUserStore, StoreError, TokenService, UserService, UserStore,
    WeatherError, WeatherService,
    display::{DisplayOptions, RenderError, UnitSystem},
};
pub use state::{AppState, StartupError};

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`); `LOG_FORMAT=json` switches to
/// one JSON object per line.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    // A subscriber may already be installed (tests, embedding)
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
