//! Client side of the weather lookup: input validation, error presentation,
//! recent searches, session state and the backend API client.
//!
//! Nothing here depends on the server runtime; the `weather-client` binary
//! drives it from the command line.

pub mod api;
pub mod errors;
pub mod input;
pub mod recent;
pub mod session;
pub mod storage;

pub use api::WeatherApiClient;
pub use errors::{ClientError, ErrorNotice};
pub use recent::{RecentSearchEntry, RecentSearches, time_ago};
pub use session::{Phase, SearchTicket, SessionState};
pub use storage::{JsonFileStore, LocalStore, LocalStoreError, MemoryStore};
