//! Identity and token configuration.

use super::env_parse;
use std::env;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HS256 key used to sign bearer tokens
    pub token_secret: String,
    pub token_ttl_seconds: u64,
    pub min_password_length: usize,
    /// Argon2 memory cost per password hash
    pub password_memory_kib: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: "secret".to_string(),
            token_ttl_seconds: 7 * 24 * 3600,
            min_password_length: 6,
            password_memory_kib: argon2::Params::DEFAULT_M_COST,
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            token_secret: env::var("JWT_SECRET").unwrap_or(defaults.token_secret),
            token_ttl_seconds: env_parse("TOKEN_TTL_SECONDS").unwrap_or(defaults.token_ttl_seconds),
            min_password_length: defaults.min_password_length,
            password_memory_kib: env_parse("PASSWORD_HASH_MEMORY_KIB")
                .unwrap_or(defaults.password_memory_kib),
        }
    }
}
