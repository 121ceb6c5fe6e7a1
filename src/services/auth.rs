//! Authentication service implementation
//!
//! This service handles admin login against the configured credentials and
//! the issuing and verification of the bearer tokens that gate the admin API.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::utils::errors::{Result, SwingRegError};

/// Role claim carried by admin tokens
pub const ROLE_ADMIN: &str = "admin";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Authenticated user summary returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub email: String,
    pub role: String,
}

/// Successful login result
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: AuthenticatedUser,
}

/// Authentication service for admin access control
#[derive(Debug, Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Check the supplied credentials against the configured admin account
    /// and issue a signed token on success.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        if self.config.admin_email.is_empty() || self.config.admin_password.is_empty() {
            return Err(SwingRegError::Config(
                "Admin credentials not configured".to_string(),
            ));
        }

        if email != self.config.admin_email || password != self.config.admin_password {
            warn!(email = email, "Failed admin login attempt");
            return Err(SwingRegError::Unauthenticated(
                "Invalid credentials".to_string(),
            ));
        }

        let token = self.issue_token(email, ROLE_ADMIN)?;
        info!(email = email, "Admin logged in");

        Ok(LoginOutcome {
            token,
            user: AuthenticatedUser {
                email: email.to_string(),
                role: ROLE_ADMIN.to_string(),
            },
        })
    }

    /// Sign a token for the given subject and role
    pub fn issue_token(&self, email: &str, role: &str) -> Result<String> {
        if self.config.jwt_secret.is_empty() {
            return Err(SwingRegError::Config("JWT secret not configured".to_string()));
        }

        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.config.token_expiry_hours)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| SwingRegError::Config(format!("Failed to sign token: {}", e)))?;

        Ok(token)
    }

    /// Verify token signature and expiry, returning the decoded claims.
    ///
    /// Any decode failure (malformed, expired, bad signature) reads as an
    /// unauthenticated caller; the reason is only logged.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            debug!(error = %e, "Token verification failed");
            SwingRegError::Unauthenticated("Invalid or expired token".to_string())
        })?;

        Ok(token_data.claims)
    }

    /// Verify the token and require a specific role claim
    pub fn require_role(&self, token: &str, role: &str) -> Result<Claims> {
        let claims = self.verify(token)?;

        if claims.role != role {
            warn!(email = %claims.email, role = %claims.role, required = role, "Role check failed");
            return Err(SwingRegError::Forbidden(format!(
                "{} access required",
                role
            )));
        }

        Ok(claims)
    }
}
