//! Shared application state handed to every worker.

use crate::{
    config::AppConfig,
    services::{
        AccountError, AppMetrics, Database, DatabaseError, InMemorySearchStore, InMemoryUserStore,
        SearchStore, SimpleRateLimiter, SqliteSearchStore, SqliteUserStore, TokenService,
        UserService, UserStore, WeatherError, WeatherService,
    },
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to build weather client: {0}")]
    Weather(#[from] WeatherError),
    #[error("failed to create metrics: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error("failed to open database: {0}")]
    Database(#[from] DatabaseError),
    #[error("invalid account settings: {0}")]
    Accounts(#[from] AccountError),
}

/// Services shared across workers. Cloning is cheap: every member is either
/// reference counted or plain configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub weather: WeatherService,
    pub searches: Arc<dyn SearchStore>,
    pub users: UserService,
    pub tokens: TokenService,
    pub limiter: SimpleRateLimiter,
    pub metrics: AppMetrics,
}

impl AppState {
    /// Accounts and search history go to SQLite when a database path is
    /// configured and stay in memory otherwise.
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        let (searches, accounts): (Arc<dyn SearchStore>, Arc<dyn UserStore>) =
            match &config.database.path {
                Some(path) => {
                    let db = Database::open(path)?;
                    (
                        Arc::new(SqliteSearchStore::new(db.clone())),
                        Arc::new(SqliteUserStore::new(db)),
                    )
                }
                None => (
                    Arc::new(InMemorySearchStore::new()),
                    Arc::new(InMemoryUserStore::default()),
                ),
            };

        Ok(Self {
            weather: WeatherService::new(&config.weather)?,
            searches,
            users: UserService::with_store(&config.auth, accounts)?,
            tokens: TokenService::new(&config.auth),
            limiter: SimpleRateLimiter::new(config.rate_limit.clone()),
            metrics: AppMetrics::new()?,
            config,
        })
    }

    /// Replace the search history backend
    pub fn with_search_store(mut self, store: Arc<dyn SearchStore>) -> Self {
        self.searches = store;
        self
    }
}
