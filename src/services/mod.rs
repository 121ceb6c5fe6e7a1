//! Services module
//!
//! This module contains business logic services

pub mod admission;
pub mod auth;
pub mod notification;
pub mod registration;

// Re-export commonly used services
pub use admission::{AdmissionEngine, AdmissionOutcome};
pub use auth::{AuthService, AuthenticatedUser, Claims, LoginOutcome, ROLE_ADMIN};
pub use notification::{EmailData, EmailTransport, NotificationService, OutgoingEmail, SmtpMailer};
pub use registration::{RegistrationReceipt, RegistrationService};

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabasePool;
use crate::database::RegistrationRepository;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth: AuthService,
    pub notifications: NotificationService,
    pub registrations: RegistrationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized against the
    /// configured SMTP transport.
    pub fn new(pool: DatabasePool, settings: &Settings) -> Result<Self> {
        let transport = Arc::new(SmtpMailer::new(&settings.email)?);
        Ok(Self::with_transport(pool, settings, transport))
    }

    /// Create a ServiceFactory with a caller-supplied email transport. Tests
    /// use this to observe outgoing mail.
    pub fn with_transport(
        pool: DatabasePool,
        settings: &Settings,
        transport: Arc<dyn EmailTransport>,
    ) -> Self {
        let auth = AuthService::new(settings.auth.clone());
        let notifications = NotificationService::new(transport, settings.email.clone());

        let registration_repository = RegistrationRepository::new(pool.clone());
        let admission = AdmissionEngine::new(pool, registration_repository.clone());
        let registrations = RegistrationService::new(
            admission,
            registration_repository,
            notifications.clone(),
        );

        Self {
            auth,
            notifications,
            registrations,
        }
    }
}
