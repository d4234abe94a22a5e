//! Account endpoint handlers.

use crate::{
    error::ApiError,
    middleware::{extract_request_id, require_identity},
    models::{
        AuthResponse, LoginRequest, MeResponse, RegisterRequest,
        audit::{AuthAuditEvent, AuthEventType},
    },
    services::users::User,
    state::AppState,
    utils::http::{extract_client_ip, extract_user_agent},
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

fn audit(req: &HttpRequest, event_type: AuthEventType, email: &str) -> AuthAuditEvent {
    AuthAuditEvent::new(event_type, extract_client_ip(req), req.path().to_string())
        .with_user_agent(extract_user_agent(req))
        .with_request_id(extract_request_id(req))
        .with_email(email)
}

fn session_for(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    Ok(AuthResponse {
        token: state.tokens.issue(&user.id)?,
        user: user.profile(),
    })
}

/// Account registration endpoint
#[api_v2_operation(
    summary = "Register",
    description = "Creates an account and returns a bearer token. Passwords must be at least 6 characters.",
    tags("Users"),
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid email or password too short"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    req: HttpRequest,
    payload: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<web::Json<AuthResponse>, Error> {
    let user = match state.users.register(&payload).await {
        Ok(user) => user,
        Err(e) => {
            audit(&req, AuthEventType::RegistrationFailure, &payload.email)
                .with_reason(e.to_string())
                .log();
            return Err(ApiError::from(e).into());
        }
    };

    audit(&req, AuthEventType::RegistrationSuccess, &user.email)
        .with_user_id(Some(user.id.clone()))
        .log();

    Ok(web::Json(session_for(&state, &user)?))
}

/// User login endpoint
#[api_v2_operation(
    summary = "Login",
    description = "Checks email and password and returns a bearer token.",
    tags("Users"),
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    req: HttpRequest,
    payload: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<web::Json<AuthResponse>, Error> {
    let user = match state.users.authenticate(&payload.email, &payload.password).await {
        Ok(user) => user,
        Err(e) => {
            audit(&req, AuthEventType::LoginFailure, &payload.email)
                .with_reason(e.to_string())
                .log();
            return Err(ApiError::from(e).into());
        }
    };

    audit(&req, AuthEventType::LoginSuccess, &user.email)
        .with_user_id(Some(user.id.clone()))
        .log();

    Ok(web::Json(session_for(&state, &user)?))
}

/// Current user endpoint
#[api_v2_operation(
    summary = "Current User",
    description = "Returns the profile of the bearer token's owner.",
    tags("Users"),
    responses(
        (status = 200, description = "Successful response", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<web::Json<MeResponse>, Error> {
    let identity = require_identity(&req)?;

    // A valid token for a user that no longer exists
    let user = state
        .users
        .find_by_id(&identity.user_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    Ok(web::Json(MeResponse {
        user: user.profile(),
    }))
}
