//! Search history endpoint handlers.

use crate::{
    error::ApiError,
    middleware::require_identity,
    models::SearchListResponse,
    services::history::{RECENT_SEARCH_LIMIT, USER_SEARCH_LIMIT},
    state::AppState,
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Recent searches from all users
#[api_v2_operation(
    summary = "Recent Searches",
    description = "Returns the 20 most recent weather lookups from all users, newest first.",
    tags("Searches"),
    responses(
        (status = 200, description = "Successful response", body = SearchListResponse)
    )
)]
pub async fn recent_searches(
    state: web::Data<AppState>,
) -> Result<web::Json<SearchListResponse>, Error> {
    let searches = state
        .searches
        .recent(RECENT_SEARCH_LIMIT)
        .await
        .map_err(ApiError::from)?;

    Ok(web::Json(SearchListResponse { searches }))
}

/// The caller's own searches
#[api_v2_operation(
    summary = "My Searches",
    description = "Returns up to 50 of the authenticated caller's lookups, newest first. Requires `Authorization: Bearer <token>`.",
    tags("Searches"),
    responses(
        (status = 200, description = "Successful response", body = SearchListResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn my_searches(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<SearchListResponse>, Error> {
    let identity = require_identity(&req)?;

    let searches = state
        .searches
        .for_user(&identity.user_id, USER_SEARCH_LIMIT)
        .await
        .map_err(ApiError::from)?;

    Ok(web::Json(SearchListResponse { searches }))
}
