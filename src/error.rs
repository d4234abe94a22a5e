//! API error type and its HTTP rendering.
//!
//! Every failure a handler can produce ends up here so that clients always
//! receive `{"message": ...}` with a meaningful status code.

use crate::{
    models::ErrorResponse,
    services::{
        display::RenderError, history::StoreError, tokens::TokenError, users::AccountError,
        weather::WeatherError,
    },
};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    TooManyRequests(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            message: self.to_string(),
        })
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::NotFound(city) => ApiError::NotFound(format!("City \"{city}\" not found")),
            WeatherError::RateLimited => {
                ApiError::TooManyRequests("Weather API quota exceeded, please wait and try again".to_string())
            }
            WeatherError::MissingApiKey => {
                ApiError::Internal("Weather service is not configured".to_string())
            }
            WeatherError::Timeout
            | WeatherError::Network(_)
            | WeatherError::UpstreamStatus(_)
            | WeatherError::Decode(_) => {
                ApiError::BadGateway("Weather service temporarily unavailable".to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => {
                ApiError::Conflict("An account with this email already exists".to_string())
            }
            other => {
                tracing::error!(error = %other, "Store operation failed");
                ApiError::Internal("Storage unavailable".to_string())
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidEmail | AccountError::PasswordTooShort(_) => {
                ApiError::BadRequest(err.to_string())
            }
            AccountError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AccountError::Hashing(message) => {
                tracing::error!(error = %message, "Password hashing failed");
                ApiError::Internal("Account service unavailable".to_string())
            }
            AccountError::Store(store) => store.into(),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::BadGateway(format!("Cannot render weather data: {err}"))
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(message) => ApiError::Internal(message),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_errors_map_to_status_codes() {
        let cases = [
            (WeatherError::NotFound("Atlantis".to_string()), StatusCode::NOT_FOUND),
            (WeatherError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (WeatherError::Timeout, StatusCode::BAD_GATEWAY),
            (WeatherError::UpstreamStatus(503), StatusCode::BAD_GATEWAY),
            (WeatherError::MissingApiKey, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_not_found_message_names_city() {
        let err = ApiError::from(WeatherError::NotFound("Atlantis".to_string()));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn test_account_errors_map_to_status_codes() {
        assert_eq!(
            ApiError::from(AccountError::PasswordTooShort(6)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AccountError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AccountError::Store(StoreError::DuplicateEmail("a@b.co".into())))
                .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(TokenError::Expired).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_error_body_is_message_envelope() {
        let resp = ApiError::bad_request("city query param required").error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
