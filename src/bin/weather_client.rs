//! Command-line client for the weather lookup API.
//!
//! Keeps the unit preference, recent searches and the login token in a local
//! JSON file, like a browser would in local storage.

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, time::Duration};
use weather_lookup_api::{
    UnitSystem, WeatherView,
    client::{
        ErrorNotice, JsonFileStore, LocalStore, Phase, RecentSearches, SessionState,
        WeatherApiClient, storage::UNIT_KEY, time_ago,
    },
    models::RegisterRequest,
};

const TOKEN_KEY: &str = "weather-token";

#[derive(Debug, Parser)]
#[command(name = "weather-client", version, about = "Weather lookup client")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "WEATHER_API_URL", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Local state file (unit preference, recent searches, token)
    #[arg(long, env = "WEATHER_CLIENT_STATE", default_value = ".weather-client.json")]
    state_file: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the weather for a city
    Show {
        city: String,

        /// Override the saved unit preference for this lookup
        #[arg(long)]
        units: Option<UnitSystem>,
    },
    /// Switch between metric and imperial
    ToggleUnits,
    /// List recently searched cities
    Recent,
    /// Forget recently searched cities
    ClearRecent,
    /// Searches stored on the server
    History {
        /// Only searches made while logged in
        #[arg(long)]
        mine: bool,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn saved_units(store: &dyn LocalStore) -> anyhow::Result<UnitSystem> {
    Ok(store
        .get(UNIT_KEY)?
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default())
}

fn print_view(view: &WeatherView) {
    println!("{}", view.location);
    println!(
        "  {}°{} (feels like {}°{})  {} [{}]",
        view.temperature, view.temp_unit, view.feels_like, view.temp_unit, view.description, view.icon
    );
    println!(
        "  Humidity {}  Wind {}  Visibility {}  Pressure {}",
        view.humidity, view.wind, view.visibility, view.pressure
    );
    println!("  Sunrise {}  Sunset {}", view.sunrise, view.sunset);
    println!("  UV {} ({}): {}", view.uv_index, view.uv_band, view.uv_advice);
    println!("  Air quality: {}", view.air_quality);

    println!("  Next hours:");
    for card in &view.hourly {
        println!("    {:>5}  {:>3}°  {}", card.time, card.temperature, card.description);
    }
    println!("  Next days:");
    for card in &view.daily {
        println!("    {:<4} {:>3}° / {:>3}°  {}", card.day, card.high, card.low, card.description);
    }
}

fn print_notice(notice: &ErrorNotice) {
    let label = if notice.critical { "error" } else { "warning" };
    eprintln!("{label}: {}", notice.message);
}

async fn show(
    api: &WeatherApiClient,
    store: &dyn LocalStore,
    city: &str,
    units: Option<UnitSystem>,
) -> anyhow::Result<()> {
    let units = match units {
        Some(units) => units,
        None => saved_units(store)?,
    };
    let state = SessionState::new(units, RecentSearches::load(store)?);

    let (state, ticket) = state.begin_search(city);
    let state = match ticket {
        Some(ticket) => match api.view(&ticket.city, ticket.units).await {
            Ok(view) => state.apply_result(&ticket, view, now_ms()),
            Err(e) => state.fail(&ticket, &e),
        },
        None => state,
    };

    match &state.phase {
        Phase::Loaded(view) => {
            print_view(view);
            state.recent.save(store)?;
        }
        Phase::Failed(notice) => {
            print_notice(notice);
            anyhow::bail!("lookup failed");
        }
        Phase::Idle | Phase::Loading => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let store = JsonFileStore::new(&cli.state_file);
    let token = store.get(TOKEN_KEY)?;
    let api = WeatherApiClient::new(&cli.server, Duration::from_secs(cli.timeout))?.with_token(token);

    match cli.command {
        Command::Show { city, units } => show(&api, &store, &city, units).await?,
        Command::ToggleUnits => {
            let units = saved_units(&store)?.toggled();
            store.set(UNIT_KEY, units.as_str())?;
            println!("Units: {units}");
        }
        Command::Recent => {
            let recent = RecentSearches::load(&store)?;
            if recent.is_empty() {
                println!("No recent searches");
            }
            let now = now_ms();
            for entry in recent.entries() {
                println!("{:<24} {}", entry.city, time_ago(entry.timestamp, now));
            }
        }
        Command::ClearRecent => {
            RecentSearches::default().save(&store)?;
            println!("Recent searches cleared");
        }
        Command::History { mine } => {
            let searches = if mine {
                api.my_searches().await
            } else {
                api.recent_searches().await
            };
            let searches = searches.map_err(|e| anyhow::anyhow!(ErrorNotice::present(&e).message))?;
            for search in searches {
                println!("{}  {}", search.created_at, search.city);
            }
        }
        Command::Register { email, password, name } => {
            let request = RegisterRequest { name, email, password };
            let session = api
                .register(&request)
                .await
                .context("registration failed")?;
            store.set(TOKEN_KEY, &session.token)?;
            println!("Registered {}", session.user.email);
        }
        Command::Login { email, password } => {
            let session = api
                .login(&email, &password)
                .await
                .context("login failed")?;
            store.set(TOKEN_KEY, &session.token)?;
            println!("Logged in as {}", session.user.email);
        }
        Command::Logout => {
            store.remove(TOKEN_KEY)?;
            println!("Logged out");
        }
    }

    Ok(())
}
