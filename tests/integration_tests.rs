use actix_web::{http::StatusCode, test};
use weather_lookup_api::{
    AppConfig, AppState, MetricsConfig, RateLimitConfig, WeatherConfig, create_app,
    models::{HealthResponse, VersionResponse},
};

fn config() -> AppConfig {
    AppConfig {
        weather: WeatherConfig::mock(),
        rate_limit: RateLimitConfig::disabled(),
        ..AppConfig::default()
    }
}

/// Runs the full application stack, middleware included
#[actix_web::test]
async fn test_health_endpoint_integration() {
    let app = test::init_service(create_app(AppState::new(config()).unwrap())).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"), "got {content_type}");

    let body: HealthResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, "healthy");
    assert_eq!(body.weather_source, "mock");
}

#[actix_web::test]
async fn test_version_endpoint_integration() {
    let app = test::init_service(create_app(AppState::new(config()).unwrap())).await;

    let req = test::TestRequest::get().uri("/api/version").to_request();
    let body: VersionResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    assert!(!body.commit.is_empty());
    assert!(!body.build_time.is_empty());
}

#[actix_web::test]
async fn test_metrics_reflect_weather_lookups() {
    let app = test::init_service(create_app(AppState::new(config()).unwrap())).await;

    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=Oslo")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.contains("http_requests_total"));
    assert!(text.contains("weather_lookups_total"));
    assert!(text.contains(r#"source="mock""#));
    assert!(text.contains("search_persist_failures_total"));
}

#[actix_web::test]
async fn test_metrics_disabled() {
    let config = AppConfig {
        metrics: MetricsConfig { enabled: false },
        ..config()
    };
    let app = test::init_service(create_app(AppState::new(config).unwrap())).await;

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_openapi_spec_lists_routes() {
    let app = test::init_service(create_app(AppState::new(config()).unwrap())).await;

    let req = test::TestRequest::get().uri("/api/spec/v2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let spec: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(spec["info"]["title"], "Weather Lookup API");

    let paths = spec["paths"].as_object().unwrap();
    for path in [
        "/api/health",
        "/api/weather/current",
        "/api/weather/forecast",
        "/api/weather/view",
        "/api/searches",
        "/api/my-searches",
        "/api/user/register",
        "/api/user/login",
        "/api/user/me",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}

#[actix_web::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = test::init_service(create_app(AppState::new(config()).unwrap())).await;

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("x-request-id", "trace-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-123");

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(!generated.is_empty());
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let app = test::init_service(create_app(AppState::new(config()).unwrap())).await;

    let req = test::TestRequest::get().uri("/api/nope").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
