//! Client error taxonomy and the user-facing notices built from it.

use std::time::Duration;

/// Recoverable notices disappear on their own after this long
pub const AUTO_DISMISS_AFTER: Duration = Duration::from_secs(10);

const FETCH_PREFIX: &str = "Unable to fetch weather data. ";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("city \"{0}\" not found")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("too many requests")]
    RateLimited,
    #[error("cannot render weather data: {0}")]
    Rendering(String),
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Critical errors need the user's attention and never auto-dismiss
    pub fn is_critical(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

/// What the user sees for an error
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNotice {
    pub message: String,
    pub critical: bool,
    pub auto_dismiss_after: Option<Duration>,
}

impl ErrorNotice {
    /// The single entry point for turning an error into a notice
    pub fn present(error: &ClientError) -> Self {
        let message = match error {
            ClientError::Validation(message) => message.clone(),
            ClientError::NotFound(city) => format!(
                "{FETCH_PREFIX}City \"{city}\" not found. Please check the spelling and try again."
            ),
            ClientError::Network(_) => {
                format!("{FETCH_PREFIX}Network error. Please check your connection and try again.")
            }
            ClientError::RateLimited => {
                format!("{FETCH_PREFIX}Too many requests. Please wait a moment and try again.")
            }
            ClientError::Rendering(_) => {
                "Weather data arrived in an unexpected format. Please try again.".to_string()
            }
            ClientError::Other(message) if message.trim().is_empty() => {
                format!("{FETCH_PREFIX}An unexpected error occurred. Please try again.")
            }
            ClientError::Other(message) => format!("{FETCH_PREFIX}{message}"),
        };

        let critical = error.is_critical();
        Self {
            message,
            critical,
            auto_dismiss_after: (!critical).then_some(AUTO_DISMISS_AFTER),
        }
    }
}
