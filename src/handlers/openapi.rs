//! OpenAPI specification generation and app factory.

use crate::{
    handlers::{
        current_weather, forecast, get_metrics, health, login, me, my_searches, recent_searches,
        register, version, weather_view,
    },
    middleware::{MetricsMiddleware, OptionalAuth, RequestIdMiddleware},
    state::AppState,
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Weather Lookup API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Weather lookup service: proxies current conditions and forecasts from OpenWeatherMap \
                (or a deterministic mock), keeps a search history and provides basic accounts.\n\n\
                ## Responses\n\
                Successful weather responses are wrapped as `{\"data\": ...}`. Every error is \
                `{\"message\": \"...\"}` with a matching status code.\n\
                \n\
                ## Authentication\n\
                `POST /api/user/register` and `POST /api/user/login` return a bearer token. Send it as \
                `Authorization: Bearer <token>`. It is required by `/api/my-searches` and \
                `/api/user/me`, and optional on weather lookups, where it attributes the search to \
                the caller. Invalid tokens on optional routes are ignored.\n\
                \n\
                **Configuration:**\n\
                - `MOCK_WEATHER=true` serves synthesized weather, stable per city name\n\
                - `OPENWEATHER_API_KEY` configures the upstream key\n\
                - `JWT_SECRET` configures the token signing secret\n\
                - `RATE_LIMIT_RPM` / `RATE_LIMIT_PERIOD` configure per-IP limits on weather routes"
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the application with all routes and middleware
///
/// Used by the server binary and by the integration tests, so both exercise
/// the same middleware stack and route table.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let tokens = state.tokens.clone();
    let metrics = state.metrics.clone();

    App::new()
        .wrap(OptionalAuth)
        .wrap(MetricsMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(tokens))
        .app_data(web::Data::new(metrics))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/api/weather/current").route(web::get().to(current_weather)))
        .service(web::resource("/api/weather/forecast").route(web::get().to(forecast)))
        .service(web::resource("/api/weather/view").route(web::get().to(weather_view)))
        .service(web::resource("/api/searches").route(web::get().to(recent_searches)))
        .service(web::resource("/api/my-searches").route(web::get().to(my_searches)))
        .service(web::resource("/api/user/register").route(web::post().to(register)))
        .service(web::resource("/api/user/login").route(web::post().to(login)))
        .service(web::resource("/api/user/me").route(web::get().to(me)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}
