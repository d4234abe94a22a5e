//! Rate limiting service for controlling request frequency.

use crate::{config::RateLimitConfig, error::ApiError, utils::http::extract_client_ip};
use actix_web::HttpRequest;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Simple in-memory rate limiter
///
/// Counts requests per key (the client IP) in fixed windows of
/// `period_seconds`.
#[derive(Clone)]
pub struct SimpleRateLimiter {
    config: RateLimitConfig,
    storage: Arc<Mutex<HashMap<String, (usize, Instant)>>>,
}

impl SimpleRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns `true` if the request should be allowed, `false` if rate limited.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        if !self.config.enabled {
            return true;
        }

        let period = Duration::from_secs(self.config.period_seconds);
        // Counters stay consistent even if a holder panicked
        let mut storage = self
            .storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Clean up expired entries
        storage.retain(|_, (_, started)| now.duration_since(*started) < period);

        let (count, _) = storage.entry(key.to_string()).or_insert((0, now));
        if *count >= self.config.max_requests {
            return false;
        }
        *count += 1;
        true
    }
}

/// Apply the limiter to a request, keyed by client IP
pub fn enforce_rate_limit(req: &HttpRequest, limiter: &SimpleRateLimiter) -> Result<(), ApiError> {
    let ip = extract_client_ip(req);

    if !limiter.check_rate_limit(&ip) {
        tracing::warn!(target: "request", ip_address = %ip, path = %req.path(), "Rate limit exceeded");
        return Err(ApiError::TooManyRequests(
            "Rate limit exceeded. Please try again later.".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: usize) -> SimpleRateLimiter {
        SimpleRateLimiter::new(RateLimitConfig {
            enabled: true,
            max_requests,
            period_seconds: 60,
        })
    }

    #[test]
    fn test_limit_per_key() {
        let limiter = limiter(2);
        assert!(limiter.check_rate_limit("1.1.1.1"));
        assert!(limiter.check_rate_limit("1.1.1.1"));
        assert!(!limiter.check_rate_limit("1.1.1.1"));
        assert!(limiter.check_rate_limit("2.2.2.2"));
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1);
        let start = Instant::now();
        assert!(limiter.check_at("ip", start));
        assert!(!limiter.check_at("ip", start + Duration::from_secs(59)));
        assert!(limiter.check_at("ip", start + Duration::from_secs(60)));
    }

    #[test]
    fn test_disabled_limiter_allows_everything() {
        let limiter = SimpleRateLimiter::new(RateLimitConfig::disabled());
        for _ in 0..500 {
            assert!(limiter.check_rate_limit("ip"));
        }
    }
}
