use actix_web::HttpServer;
use weather_lookup_api::{AppConfig, AppState, create_app, init_tracing};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    let bind_address = config.server.bind_address.clone();
    let workers = config.server.workers;

    if config.weather.mock {
        tracing::info!("Serving mock weather data (MOCK_WEATHER=true)");
    } else if config.weather.api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY is not set; weather lookups will fail with 500");
    }

    match &config.database.path {
        Some(path) => tracing::info!(path = %path.display(), "Persisting accounts and searches to SQLite"),
        None => tracing::warn!("DATABASE_PATH is not set; accounts and searches are kept in memory only"),
    }

    let state = AppState::new(config).map_err(std::io::Error::other)?;

    tracing::info!(%bind_address, "Server starting");

    let server = HttpServer::new(move || create_app(state.clone())).bind(&bind_address)?;
    let server = match workers {
        Some(n) => server.workers(n),
        None => server,
    };

    server.run().await
}
