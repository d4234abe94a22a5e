//! User accounts: registration, credential checks and lookup.
//!
//! Passwords are stored as Argon2id PHC strings (salt and parameters
//! embedded). Emails are matched case-insensitively.

use crate::{
    config::AuthConfig,
    models::{RegisterRequest, UserProfile},
    services::history::StoreError,
};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};
use tokio::sync::RwLock;
use uuid::Uuid;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Key used for uniqueness and lookup
    pub fn email_key(&self) -> String {
        email_key(&self.email)
    }
}

pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccountError {
    #[error("A valid email address is required")]
    InvalidEmail,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

/// Storage seam for accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken
    async fn insert(&self, user: User) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
}

/// Process-local accounts keyed by lowercased email
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let key = user.email_key();
        if users.contains_key(&key) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        users.insert(key, user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&email_key(email)).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.id == id)
            .cloned())
    }
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Argon2<'static>,
    min_password_length: usize,
}

impl UserService {
    /// Accounts kept in process memory
    pub fn new(config: &AuthConfig) -> Result<Self, AccountError> {
        Self::with_store(config, Arc::new(InMemoryUserStore::default()))
    }

    pub fn with_store(config: &AuthConfig, store: Arc<dyn UserStore>) -> Result<Self, AccountError> {
        let params = Params::new(
            config.password_memory_kib,
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| AccountError::Hashing(e.to_string()))?;

        Ok(Self {
            store,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            min_password_length: config.min_password_length,
        })
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AccountError> {
        let email = request.email.trim();
        if !is_valid_email(email) {
            return Err(AccountError::InvalidEmail);
        }
        if request.password.chars().count() < self.min_password_length {
            return Err(AccountError::PasswordTooShort(self.min_password_length));
        }
        if self.store.find_by_email(email).await?.is_some() {
            return Err(StoreError::DuplicateEmail(email.to_string()).into());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone().unwrap_or_default().trim().to_string(),
            email: email.to_string(),
            password_hash: self.hash_password(request.password.clone()).await?,
            created_at: Utc::now(),
        };

        // The store's uniqueness check settles concurrent registrations
        self.store.insert(user.clone()).await?;
        Ok(user)
    }

    /// Unknown email and wrong password fail the same way
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await?
        {
            Ok(user)
        } else {
            Err(AccountError::InvalidCredentials)
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AccountError> {
        Ok(self.store.find_by_id(id).await?)
    }

    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
                .map_err(|e| AccountError::Hashing(e.to_string()))?;
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AccountError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))?
    }

    async fn verify_password(&self, password: String, stored: String) -> Result<bool, AccountError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let parsed =
                PasswordHash::new(&stored).map_err(|e| AccountError::Hashing(e.to_string()))?;
            Ok(hasher.verify_password(password.as_bytes(), &parsed).is_ok())
        })
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))?
    }
}
