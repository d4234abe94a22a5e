//! HTTP client for the weather backend.

use crate::{
    client::errors::ClientError,
    models::{
        AuthResponse, DataResponse, ErrorResponse, LoginRequest, RegisterRequest, SearchRecord,
        SearchListResponse, WeatherRecord, WeatherView,
    },
    services::display::UnitSystem,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl WeatherApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Other(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(format!("{}{path}", self.base_url)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(format!("{}{path}", self.base_url)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn weather_query(city: &str, units: UnitSystem) -> [(&'static str, String); 2] {
        [("city", city.to_string()), ("units", units.to_string())]
    }

    /// Raw current conditions; also records the search on the server
    pub async fn current(&self, city: &str, units: UnitSystem) -> Result<WeatherRecord, ClientError> {
        let request = self.get("/api/weather/current").query(&Self::weather_query(city, units));
        let body: DataResponse<WeatherRecord> = send(request, city).await?;
        Ok(body.data)
    }

    /// Display-ready view; also records the search on the server
    pub async fn view(&self, city: &str, units: UnitSystem) -> Result<WeatherView, ClientError> {
        let request = self.get("/api/weather/view").query(&Self::weather_query(city, units));
        let body: DataResponse<WeatherView> = send(request, city).await?;
        Ok(body.data)
    }

    pub async fn recent_searches(&self) -> Result<Vec<SearchRecord>, ClientError> {
        let body: SearchListResponse = send(self.get("/api/searches"), "").await?;
        Ok(body.searches)
    }

    pub async fn my_searches(&self) -> Result<Vec<SearchRecord>, ClientError> {
        let body: SearchListResponse = send(self.get("/api/my-searches"), "").await?;
        Ok(body.searches)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        send(self.post("/api/user/register").json(request), "").await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        send(self.post("/api/user/login").json(&request), "").await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder, city: &str) -> Result<T, ClientError> {
    let response = request
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(classify(response, city).await);
    }

    // A 200 whose body does not match the expected shape cannot be rendered
    response
        .json()
        .await
        .map_err(|e| ClientError::Rendering(e.to_string()))
}

async fn classify(response: Response, city: &str) -> ClientError {
    let status = response.status();
    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));

    match status {
        StatusCode::NOT_FOUND if !city.is_empty() => ClientError::NotFound(city.to_string()),
        StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited,
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        _ => ClientError::Other(message),
    }
}
