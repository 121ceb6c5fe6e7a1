//! Registration workflow service
//!
//! Ties the admission engine, the registration store, and the notifier
//! together: public sign-ups on one side, admin status transitions on the
//! other. Confirmation emails are dispatched fire-and-forget; a delivery
//! failure never changes the outcome of the operation that triggered it.

use tracing::info;

use crate::database::repositories::RegistrationRepository;
use crate::models::registration::{CreateRegistrationRequest, PaymentStatus, Registration};
use crate::services::admission::AdmissionEngine;
use crate::services::notification::{EmailData, NotificationService};
use crate::utils::errors::Result;

/// Response payload for a successful public registration
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    pub message: String,
    pub registration: Registration,
    pub is_waiting_list: bool,
    pub current_registrations: i64,
    pub max_registrations: i32,
    pub event_name: String,
    pub event_year: i32,
}

#[derive(Clone)]
pub struct RegistrationService {
    admission: AdmissionEngine,
    registrations: RegistrationRepository,
    notifications: NotificationService,
}

impl RegistrationService {
    pub fn new(
        admission: AdmissionEngine,
        registrations: RegistrationRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            admission,
            registrations,
            notifications,
        }
    }

    /// Handle a public registration submission: admit, persist, and dispatch
    /// the appropriate confirmation email.
    pub async fn register(&self, request: CreateRegistrationRequest) -> Result<RegistrationReceipt> {
        let outcome = self.admission.admit(request).await?;

        self.notifications
            .dispatch_registration_confirmation(email_data(&outcome.registration));

        let message = if outcome.is_waiting_list {
            "Registration successful! You have been added to the waiting list.".to_string()
        } else {
            "Registration successful".to_string()
        };

        Ok(RegistrationReceipt {
            message,
            registration: outcome.registration,
            is_waiting_list: outcome.is_waiting_list,
            current_registrations: outcome.current_registrations,
            max_registrations: outcome.max_registrations,
            event_name: outcome.event_name,
            event_year: outcome.event_year,
        })
    }

    /// Apply an admin-driven payment-status change and fire the matching
    /// notification: paid gets a payment confirmation, pending (typically a
    /// promotion off the waiting list) gets a registration confirmation, and
    /// cancelled/waiting get nothing.
    pub async fn set_status(&self, id: i64, status: PaymentStatus) -> Result<Registration> {
        let registration = self.registrations.update_status(id, status).await?;

        match status {
            PaymentStatus::Paid => {
                self.notifications
                    .dispatch_payment_confirmation(email_data(&registration));
            }
            PaymentStatus::Pending => {
                self.notifications
                    .dispatch_registration_confirmation(email_data(&registration));
            }
            PaymentStatus::Cancelled | PaymentStatus::Waiting => {}
        }

        info!(
            registration_id = registration.id,
            status = %status,
            "Registration status updated"
        );

        Ok(registration)
    }
}

fn email_data(registration: &Registration) -> EmailData {
    EmailData {
        first_name: registration.first_name.clone(),
        last_name: registration.last_name.clone(),
        email: registration.email.clone(),
        experience: registration.experience,
        registration_date: registration.registration_date,
        waiting_list: registration.payment_status == PaymentStatus::Waiting,
    }
}
