//! Request authentication middleware
//!
//! Bearer-token extraction and the `AdminClaims` extractor that gates the
//! admin endpoints: a missing or undecodable token reads as unauthenticated
//! (401), a valid token without the admin role as forbidden (403).

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::services::auth::{Claims, ROLE_ADMIN};
use crate::state::AppState;
use crate::utils::errors::{Result, SwingRegError};

/// Pull the bearer token out of the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| SwingRegError::Unauthenticated("Access token required".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| SwingRegError::Unauthenticated("Malformed authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| SwingRegError::Unauthenticated("Access token required".to_string()))
}

/// Claims of a verified admin token, extracted per request
#[derive(Debug, Clone)]
pub struct AdminClaims(pub Claims);

impl FromRequestParts<AppState> for AdminClaims {
    type Rejection = SwingRegError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = state.services.auth.require_role(token, ROLE_ADMIN)?;
        Ok(AdminClaims(claims))
    }
}
