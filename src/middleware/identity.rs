//! Optional bearer-token authentication.
//!
//! A valid `Authorization: Bearer <token>` attaches an [`Identity`] to the
//! request. Missing or invalid tokens are ignored here; handlers that need a
//! user call [`require_identity`].

use crate::{
    error::ApiError,
    middleware::request_id::extract_request_id,
    models::audit::{AuthAuditEvent, AuthEventType},
    services::tokens::TokenService,
    utils::http::{extract_bearer_token, extract_client_ip, extract_user_agent},
};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
};

/// The authenticated caller
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: String,
}

pub struct OptionalAuth;

impl<S, B> Transform<S, ServiceRequest> for OptionalAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = OptionalAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OptionalAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct OptionalAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for OptionalAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            if let Some(identity) = authenticate(req.request()) {
                req.extensions_mut().insert(identity);
            }
            service.call(req).await
        })
    }
}

fn authenticate(req: &HttpRequest) -> Option<Identity> {
    let token = extract_bearer_token(req)?;
    let tokens = req.app_data::<web::Data<TokenService>>()?;

    match tokens.verify(&token) {
        Ok(user_id) => Some(Identity { user_id }),
        Err(e) => {
            AuthAuditEvent::new(
                AuthEventType::TokenRejected,
                extract_client_ip(req),
                req.path().to_string(),
            )
            .with_user_agent(extract_user_agent(req))
            .with_request_id(extract_request_id(req))
            .with_reason(e.to_string())
            .log();
            None
        }
    }
}

/// Identity attached by [`OptionalAuth`], if any
pub fn extract_identity(req: &HttpRequest) -> Option<Identity> {
    req.extensions().get::<Identity>().cloned()
}

/// Identity or 401
pub fn require_identity(req: &HttpRequest) -> Result<Identity, ApiError> {
    extract_identity(req).ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use actix_web::{App, HttpResponse, test};

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match extract_identity(&req) {
            Some(identity) => HttpResponse::Ok().json(serde_json::json!({"user": identity.user_id})),
            None => HttpResponse::Ok().json(serde_json::json!({"user": null})),
        }
    }

    fn tokens() -> TokenService {
        TokenService::new(&AuthConfig::default())
    }

    #[actix_web::test]
    async fn test_valid_token_attaches_identity() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(tokens()))
                .wrap(OptionalAuth)
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let token = tokens().issue("user-1").unwrap();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user"], "user-1");
    }

    #[actix_web::test]
    async fn test_invalid_or_missing_token_is_ignored() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(tokens()))
                .wrap(OptionalAuth)
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer forged.999.abcd"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["user"].is_null());

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["user"].is_null());
    }

    #[actix_web::test]
    async fn test_require_identity_without_token() {
        let req = test::TestRequest::default().to_http_request();
        let err = require_identity(&req).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
