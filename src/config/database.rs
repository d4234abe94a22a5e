//! Persistence configuration.

use std::{env, path::PathBuf};

/// SQLite database location. Without a path, accounts and search history
/// live in process memory and are lost on restart.
#[derive(Clone, Debug, Default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn from_env() -> Self {
        Self {
            path: env::var("DATABASE_PATH")
                .ok()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }
}
