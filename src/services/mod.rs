//! Business logic and service layer modules.
//!
//! Weather lookup (upstream or mock), display shaping, search history,
//! SQLite persistence, accounts and tokens, metrics collection and rate limiting.

pub mod database;
pub mod display;
pub mod history;
pub mod metrics;
pub mod mock_weather;
pub mod rate_limit;
pub mod rng;
pub mod tokens;
pub mod users;
pub mod weather;

pub use database::{Database, DatabaseError, SqliteSearchStore, SqliteUserStore};
pub use history::{InMemorySearchStore, SearchStore, StoreError};
pub use metrics::*;
pub use rate_limit::*;
pub use tokens::{TokenError, TokenService};
pub use users::{AccountError, InMemoryUserStore, UserService, UserStore};
pub use weather::{WeatherError, WeatherService};
