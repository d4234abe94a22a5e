//! Accounts and search history survive a restart when `DATABASE_PATH` is set.

use actix_web::{http::StatusCode, test};
use std::{path::Path, time::Duration};
use weather_lookup_api::{
    AppConfig, AppState, AuthConfig, DatabaseConfig, RateLimitConfig, WeatherConfig, create_app,
    models::{AuthResponse, SearchListResponse},
};

fn config(db: &Path) -> AppConfig {
    AppConfig {
        weather: WeatherConfig::mock(),
        rate_limit: RateLimitConfig::disabled(),
        database: DatabaseConfig::at(db),
        auth: AuthConfig {
            password_memory_kib: 1024,
            ..AuthConfig::default()
        },
        ..AppConfig::default()
    }
}

async fn wait_for_recent(state: &AppState, expected: usize) {
    for _ in 0..200 {
        if state.searches.recent(20).await.unwrap().len() == expected {
            return;
        }
        actix_web::rt::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {expected} stored searches");
}

#[actix_web::test]
async fn test_accounts_and_searches_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("weather.db");

    let first = AppState::new(config(&db)).unwrap();
    let app = test::init_service(create_app(first.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(serde_json::json!({"name": "Ada", "email": "ada@example.com", "password": "hunter22"}))
        .to_request();
    let registered: AuthResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/weather/current?city=Paris")
        .insert_header(("Authorization", format!("Bearer {}", registered.token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    wait_for_recent(&first, 1).await;
    drop(app);
    drop(first);

    let restarted = AppState::new(config(&db)).unwrap();
    let app = test::init_service(create_app(restarted)).await;

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(serde_json::json!({"email": "ada@example.com", "password": "hunter22"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(login.user, registered.user);

    let req = test::TestRequest::get().uri("/api/searches").to_request();
    let recent: SearchListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(recent.searches.len(), 1);
    assert_eq!(recent.searches[0].city, "Paris");

    let req = test::TestRequest::get()
        .uri("/api/my-searches")
        .insert_header(("Authorization", format!("Bearer {}", login.token)))
        .to_request();
    let mine: SearchListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(mine.searches.len(), 1);
    assert_eq!(mine.searches[0].user.as_deref(), Some(registered.user.id.as_str()));
}

#[actix_web::test]
async fn test_duplicate_registration_rejected_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("weather.db");
    let register = || {
        test::TestRequest::post()
            .uri("/api/user/register")
            .set_json(serde_json::json!({"email": "ada@example.com", "password": "hunter22"}))
            .to_request()
    };

    let app = test::init_service(create_app(AppState::new(config(&db)).unwrap())).await;
    assert_eq!(test::call_service(&app, register()).await.status(), StatusCode::OK);
    drop(app);

    let app = test::init_service(create_app(AppState::new(config(&db)).unwrap())).await;
    assert_eq!(test::call_service(&app, register()).await.status(), StatusCode::CONFLICT);
}

#[::core::prelude::v1::test]
fn test_unopenable_database_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened as a database file
    let result = AppState::new(config(dir.path()));
    assert!(result.is_err());
}
