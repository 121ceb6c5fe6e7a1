//! Test data helpers for creating test objects

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use SwingReg::config::Settings;
use SwingReg::models::event::CreateEventRequest;
use SwingReg::models::registration::{CreateRegistrationRequest, ExperienceLevel};
use SwingReg::services::notification::EmailTransport;
use SwingReg::services::ServiceFactory;

/// Settings with a fully configured auth section for tests
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.admin_email = "admin@swingreg.fi".to_string();
    settings.auth.admin_password = "correct-horse".to_string();
    settings.auth.jwt_secret = "integration-test-secret".to_string();
    settings.email.access_code = "7331".to_string();
    settings
}

/// Build a ServiceFactory wired to the given email transport
pub fn test_services(pool: PgPool, transport: Arc<dyn EmailTransport>) -> ServiceFactory {
    ServiceFactory::with_transport(pool, &test_settings(), transport)
}

/// A valid event creation request
pub fn sample_event(year: i32, max_capacity: i32) -> CreateEventRequest {
    CreateEventRequest {
        year,
        name: format!("Midsummer Swing {}", year),
        date: Utc.with_ymd_and_hms(year, 6, 28, 16, 0, 0).unwrap(),
        max_capacity,
        registration_open: true,
        waiting_list_enabled: true,
        price: 15.0,
        venue: "Floor 33".to_string(),
        address: "Kalasatamankatu 9 A, Helsinki".to_string(),
        description: Some("Dancing with city views from floor 33".to_string()),
    }
}

/// A valid registration form submission for the given email
pub fn sample_registration(email: &str) -> CreateRegistrationRequest {
    CreateRegistrationRequest {
        first_name: "Aino".to_string(),
        last_name: "Korhonen".to_string(),
        email: email.to_string(),
        phone: "+358 40 123 4567".to_string(),
        experience: ExperienceLevel::Intermediate,
        dietary_restrictions: None,
        emergency_contact: None,
        notes: None,
    }
}
