//! Health check endpoint handler.

use crate::{models::HealthResponse, state::AppState};
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Used by load balancers and container probes. Also reports whether weather
/// data is synthesized or fetched upstream.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the current health status of the API and the active weather source (mock or upstream).",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse)
    )
)]
pub async fn health(state: web::Data<AppState>) -> Result<web::Json<HealthResponse>, Error> {
    Ok(web::Json(HealthResponse {
        status: "healthy".to_string(),
        weather_source: state.weather.source_label().to_string(),
    }))
}
