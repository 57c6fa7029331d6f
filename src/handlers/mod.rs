//! HTTP handlers
//!
//! Builds the axum router. Every handler returns `Result<_, StudioError>`
//! and the error's `IntoResponse` impl is the only place outcomes turn into
//! status codes.

pub mod auth;
pub mod health;
pub mod sessions;
pub mod teachers;
pub mod users;

use std::sync::Arc;

use axum::extract::FromRequest;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::Settings;
use crate::middleware::{
    propagate_request_id_layer, set_request_id_layer, trace_layer, LoginRateLimiter,
};
use crate::services::ServiceFactory;
use crate::utils::errors::StudioError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub login_limiter: LoginRateLimiter,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(services: ServiceFactory, settings: Settings) -> Self {
        Self {
            login_limiter: LoginRateLimiter::new(settings.auth.login_attempts_per_minute),
            services,
            settings: Arc::new(settings),
        }
    }
}

/// JSON body whose rejections become `{message}` validation errors
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(StudioError))]
pub struct ApiJson<T>(pub T);

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings);

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/session", get(sessions::list).post(sessions::create))
        .route(
            "/session/{id}",
            get(sessions::get).put(sessions::update).delete(sessions::delete),
        )
        .route(
            "/session/{id}/participate/{user_id}",
            post(sessions::participate).delete(sessions::unparticipate),
        )
        .route("/teacher", get(teachers::list))
        .route("/teacher/{id}", get(teachers::get))
        .route("/user/promote-admin", post(users::promote_self_to_admin))
        .route("/user/{id}", get(users::get).delete(users::delete));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health::health))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer())
                .layer(cors),
        )
        .with_state(state)
}

async fn not_found() -> StudioError {
    StudioError::not_found("Not found")
}

/// Permissive in development, the configured origins otherwise
fn cors_layer(settings: &Settings) -> CorsLayer {
    if settings.app.environment.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = settings
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
