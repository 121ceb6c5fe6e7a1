//! HTTP surface integration tests: status codes, auth gating, and response
//! shapes, driven through the router without a listening socket.
//!
//! Requires `TEST_DATABASE_URL`; each test skips itself when it is unset.

mod helpers;

use helpers::*;
use serial_test::serial;
use tower::ServiceExt;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};

use SwingReg::database::{DatabaseService, EventRepository};
use SwingReg::services::notification::mock::MockTransport;
use SwingReg::services::ROLE_ADMIN;
use SwingReg::state::AppState;
use SwingReg::{create_router, ServiceFactory};

async fn test_app() -> Option<(Router, AppState)> {
    let pool = test_pool().await?;
    let settings = test_settings();
    let db = DatabaseService::new(pool.clone());
    let services = ServiceFactory::with_transport(pool.clone(), &settings, MockTransport::new());
    let state = AppState::new(pool, db, services, settings);
    Some((create_router(state.clone()), state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[serial]
async fn test_health_endpoint() {
    let Some((app, _)) = test_app().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
#[serial]
async fn test_unknown_route_returns_json_404() {
    let Some((app, _)) = test_app().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let response = app.oneshot(get("/api/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
#[serial]
async fn test_admin_gating() {
    let Some((app, state)) = test_app().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    // No token
    let response = app.clone().oneshot(get("/api/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid token, wrong role
    let viewer_token = state
        .services
        .auth
        .issue_token("viewer@swingreg.fi", "viewer")
        .unwrap();
    let response = app
        .clone()
        .oneshot(get_with_token("/api/events", &viewer_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin token
    let admin_token = state
        .services
        .auth
        .issue_token("admin@swingreg.fi", ROLE_ADMIN)
        .unwrap();
    let response = app
        .oneshot(get_with_token("/api/events", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn test_login_and_verify() {
    let Some((app, _)) = test_app().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    // Wrong password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"email": "admin@swingreg.fi", "password": "wrong"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct credentials
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"email": "admin@swingreg.fi", "password": "correct-horse"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["user"]["role"], "admin");
    let token = body["token"].as_str().unwrap().to_string();

    // The issued token verifies
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/verify")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"]["email"], "admin@swingreg.fi");

    // Garbage does not
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/verify")
                .header(header::AUTHORIZATION, "Bearer garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_active_event_endpoint() {
    let Some((app, state)) = test_app().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let response = app.clone().oneshot(get("/api/events/active")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let events = EventRepository::new(state.pool.clone());
    let event = events.create(sample_event(2026, 10)).await.unwrap();
    events.activate(event.id).await.unwrap();

    let response = app.oneshot(get("/api/events/active")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["year"], 2026);
    assert_eq!(body["is_active"], true);
}

#[tokio::test]
#[serial]
async fn test_registration_submission_flow() {
    let Some((app, state)) = test_app().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let registration_body = json!({
        "first_name": "Aino",
        "last_name": "Korhonen",
        "email": "aino@example.fi",
        "phone": "+358 40 123 4567",
        "experience": "intermediate"
    });

    // No active event yet
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/registrations",
            &registration_body,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let events = EventRepository::new(state.pool.clone());
    let event = events.create(sample_event(2026, 10)).await.unwrap();
    events.activate(event.id).await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/registrations",
            &registration_body,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["is_waiting_list"], false);
    assert_eq!(body["current_registrations"], 1);
    assert_eq!(body["max_registrations"], 10);
    assert_eq!(body["event_year"], 2026);
    let registration_id = body["registration"]["id"].as_i64().unwrap();

    // Duplicate email
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/registrations",
            &registration_body,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "A registration with this email already exists");

    // Status update with an out-of-domain value
    let admin_token = state
        .services
        .auth
        .issue_token("admin@swingreg.fi", ROLE_ADMIN)
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/registrations/{}/status", registration_id),
            &json!({"payment_status": "refunded"}),
            Some(&admin_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // And with a valid one
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/registrations/{}/status", registration_id),
            &json!({"payment_status": "paid"}),
            Some(&admin_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["registration"]["payment_status"], "paid");

    // Listing embeds the event summary
    let response = app
        .clone()
        .oneshot(get_with_token("/api/registrations?page=1&limit=10", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total_records"], 1);
    assert_eq!(body["registrations"][0]["event"]["year"], 2026);

    // Stats overview
    let response = app
        .oneshot(get_with_token(
            "/api/registrations/stats/overview",
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["paid"], 1);
    assert_eq!(body["total_registrations"], 1);
}
