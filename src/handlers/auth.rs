//! Authentication handlers

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::auth::bearer_token;
use crate::state::AppState;
use crate::utils::errors::{Result, SwingRegError};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(SwingRegError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let outcome = state
        .services
        .auth
        .login(&request.email, &request.password)?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": outcome.token,
        "user": outcome.user,
    })))
}

/// `POST /api/auth/verify` — check a bearer token and echo its identity
pub async fn verify(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>> {
    let token = bearer_token(&headers)?;
    let claims = state.services.auth.verify(token)?;

    Ok(Json(json!({
        "valid": true,
        "user": {
            "email": claims.email,
            "role": claims.role,
        },
    })))
}
