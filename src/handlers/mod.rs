//! HTTP handlers module
//!
//! Route handlers and router assembly for the public and admin APIs

pub mod auth;
pub mod events;
pub mod health;
pub mod registrations;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Assemble the application router with CORS and request tracing applied
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.server);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verify", post(auth::verify))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/active", get(events::active_event))
        .route(
            "/api/events/{id}",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/events/{id}/activate", patch(events::activate_event))
        .route(
            "/api/registrations",
            get(registrations::list_registrations).post(registrations::create_registration),
        )
        .route(
            "/api/registrations/stats/overview",
            get(registrations::stats_overview),
        )
        .route(
            "/api/registrations/{id}",
            get(registrations::get_registration).delete(registrations::delete_registration),
        )
        .route(
            "/api/registrations/{id}/status",
            patch(registrations::update_status),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Route not found"})),
    )
}
