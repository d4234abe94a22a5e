//! SQLite persistence for accounts and search history.
//!
//! One connection is shared behind a mutex; every query runs on the blocking
//! pool so request workers never wait on disk I/O.

use crate::{
    models::SearchRecord,
    services::{
        history::{SearchStore, StoreError},
        users::{User, UserStore, email_key},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::{
    fs, io,
    path::Path,
    sync::{Arc, Mutex},
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    email_key TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS searches (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    user_id TEXT,
    city TEXT NOT NULL,
    response TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_searches_user ON searches(user_id, seq DESC);
"#;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("could not create database directory: {0}")]
    Io(#[from] io::Error),
    #[error("could not open database: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Unavailable(format!("corrupt stored record: {err}"))
    }
}

/// Shared handle to the SQLite database
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database file, creating parent directories and the
    /// schema as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, DatabaseError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, DatabaseError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn call<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("database lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Unavailable(format!("corrupt timestamp {value:?}: {e}")))
}

/// Search history in the `searches` table, ordered by insertion
#[derive(Clone)]
pub struct SqliteSearchStore {
    db: Database,
}

impl SqliteSearchStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

type SearchRow = (String, Option<String>, String, String, String);

fn row_to_search((id, user, city, response, created_at): SearchRow) -> Result<SearchRecord, StoreError> {
    Ok(SearchRecord {
        id,
        user,
        city,
        response: serde_json::from_str(&response)?,
        created_at,
    })
}

fn query_searches(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<SearchRecord>, StoreError> {
    let rows: Vec<SearchRow> = conn
        .prepare(sql)?
        .query_map(params, |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(row_to_search).collect()
}

#[async_trait]
impl SearchStore for SqliteSearchStore {
    async fn record(&self, search: SearchRecord) -> Result<(), StoreError> {
        let response = serde_json::to_string(&search.response)?;
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO searches (id, user_id, city, response, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![search.id, search.user, search.city, response, search.created_at],
                )?;
                Ok(())
            })
            .await
    }

    async fn for_user(&self, user_id: &str, limit: usize) -> Result<Vec<SearchRecord>, StoreError> {
        let user_id = user_id.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.db
            .call(move |conn| {
                query_searches(
                    conn,
                    "SELECT id, user_id, city, response, created_at FROM searches
                     WHERE user_id = ?1 ORDER BY seq DESC LIMIT ?2",
                    params![user_id, limit],
                )
            })
            .await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SearchRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.db
            .call(move |conn| {
                query_searches(
                    conn,
                    "SELECT id, user_id, city, response, created_at FROM searches
                     ORDER BY seq DESC LIMIT ?1",
                    params![limit],
                )
            })
            .await
    }
}

/// Accounts in the `users` table; `email_key` enforces uniqueness
#[derive(Clone)]
pub struct SqliteUserStore {
    db: Database,
}

impl SqliteUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn find_where(&self, column: &'static str, value: String) -> Result<Option<User>, StoreError> {
        self.db
            .call(move |conn| {
                let sql = format!(
                    "SELECT id, name, email, password_hash, created_at FROM users WHERE {column} = ?1"
                );
                let row: Option<(String, String, String, String, String)> = conn
                    .query_row(&sql, params![value], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                    })
                    .optional()?;

                row.map(|(id, name, email, password_hash, created_at)| {
                    Ok(User {
                        id,
                        name,
                        email,
                        password_hash,
                        created_at: parse_timestamp(&created_at)?,
                    })
                })
                .transpose()
            })
            .await
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn insert(&self, user: User) -> Result<(), StoreError> {
        self.db
            .call(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO users (id, name, email, email_key, password_hash, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        user.id,
                        user.name,
                        user.email,
                        user.email_key(),
                        user.password_hash,
                        user.created_at.to_rfc3339(),
                    ],
                );
                match inserted {
                    Ok(_) => Ok(()),
                    Err(rusqlite::Error::SqliteFailure(err, _))
                        if err.code == ErrorCode::ConstraintViolation =>
                    {
                        Err(StoreError::DuplicateEmail(user.email))
                    }
                    Err(e) => Err(e.into()),
                }
            })
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_where("email_key", email_key(email)).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.find_where("id", id.to_string()).await
    }
}
