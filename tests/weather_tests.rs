//! Weather endpoint integration tests.

use actix_web::{http::StatusCode, test};
use weather_lookup_api::{
    AppConfig, AppState, RateLimitConfig, WeatherConfig, WeatherRecord, WeatherView, create_app,
    services::mock_weather,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn mock_state() -> AppState {
    AppState::new(AppConfig {
        weather: WeatherConfig::mock(),
        rate_limit: RateLimitConfig::disabled(),
        ..AppConfig::default()
    })
    .unwrap()
}

fn upstream_state(base_url: &str, api_key: Option<&str>) -> AppState {
    AppState::new(AppConfig {
        weather: WeatherConfig {
            mock: false,
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            timeout_seconds: 2,
        },
        rate_limit: RateLimitConfig::disabled(),
        ..AppConfig::default()
    })
    .unwrap()
}

#[actix_web::test]
async fn test_current_weather_mock_mode() {
    let app = test::init_service(create_app(mock_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=London")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let record: WeatherRecord = serde_json::from_value(body["data"].clone()).unwrap();

    let expected = mock_weather::current_for_city("London", record.dt);
    assert_eq!(record, expected);
    assert_eq!(record.name, "London");
    assert!(record.main.temp_min <= record.main.temp && record.main.temp <= record.main.temp_max);
}

#[actix_web::test]
async fn test_current_weather_missing_city() {
    let app = test::init_service(create_app(mock_state())).await;

    for uri in ["/api/weather/current", "/api/weather/current?city=", "/api/weather/current?city=%20%20"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({"message": "city query param required"}));
    }
}

#[actix_web::test]
async fn test_current_weather_unknown_units() {
    let app = test::init_service(create_app(mock_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=Paris&units=kelvin")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_forecast_mock_mode() {
    let app = test::init_service(create_app(mock_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/weather/forecast?city=Tokyo")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["list"].as_array().unwrap().len(), 6);
    assert_eq!(body["data"]["daily"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn test_weather_view_is_display_ready() {
    let app = test::init_service(create_app(mock_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/weather/view?city=Sydney&units=imperial")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let view: WeatherView = serde_json::from_value(body["data"].clone()).unwrap();

    assert_eq!(view.location, "Sydney, XX");
    assert_eq!(view.temp_unit, "F");
    assert!(view.wind.ends_with(" mph"));
    assert_eq!(view.visibility, "6.2 mi");
    assert!(view.humidity.ends_with('%'));
    assert_eq!(view.hourly.len(), 6);
    assert_eq!(view.daily.len(), 5);
    assert!(view.air_quality_index <= 4);
}

#[actix_web::test]
async fn test_weather_rate_limit() {
    let state = AppState::new(AppConfig {
        weather: WeatherConfig::mock(),
        rate_limit: RateLimitConfig {
            enabled: true,
            max_requests: 2,
            period_seconds: 60,
        },
        ..AppConfig::default()
    })
    .unwrap();
    let app = test::init_service(create_app(state)).await;

    let statuses: Vec<StatusCode> = {
        let mut statuses = Vec::new();
        for _ in 0..3 {
            let req = test::TestRequest::get()
                .uri("/api/weather/current?city=Rome")
                .insert_header(("X-Forwarded-For", "198.51.100.4"))
                .to_request();
            statuses.push(test::call_service(&app, req).await.status());
        }
        statuses
    };

    assert_eq!(
        statuses,
        [StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
    );

    // Another client is unaffected
    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=Rome")
        .insert_header(("X-Forwarded-For", "198.51.100.5"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_upstream_city_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Atlantis"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;

    let app = test::init_service(create_app(upstream_state(&server.uri(), Some("key")))).await;
    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=Atlantis")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "City \"Atlantis\" not found");
}

#[actix_web::test]
async fn test_upstream_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let app = test::init_service(create_app(upstream_state(&server.uri(), Some("key")))).await;
    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=London")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[actix_web::test]
async fn test_upstream_passthrough() {
    let server = MockServer::start().await;
    let record = mock_weather::current_for_city("Berlin", 1_700_000_000);
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Berlin"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&record))
        .mount(&server)
        .await;

    let app = test::init_service(create_app(upstream_state(&server.uri(), Some("key")))).await;
    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=Berlin")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"], serde_json::to_value(&record).unwrap());
}

#[actix_web::test]
async fn test_missing_api_key() {
    let app = test::init_service(create_app(upstream_state("http://127.0.0.1:9", None))).await;

    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=London")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_upstream_unreachable() {
    let app = test::init_service(create_app(upstream_state("http://127.0.0.1:9", Some("key")))).await;

    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=London")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Weather service temporarily unavailable");
}
