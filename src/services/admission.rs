//! Admission engine implementation
//!
//! Decides whether a new registrant is seated or waitlisted and persists the
//! registration in the same step. The whole sequence (read active event,
//! count occupied seats, decide, insert) runs in one database transaction
//! holding a row lock on the active event, so two submissions contending for
//! the last seat serialize instead of both being seated.

use sqlx::PgPool;
use tracing::info;

use crate::database::repositories::RegistrationRepository;
use crate::models::event::Event;
use crate::models::registration::{
    CreateRegistrationRequest, NewRegistration, PaymentStatus, Registration,
};
use crate::utils::errors::{Result, SwingRegError};

/// Outcome of an admission: the stored registration plus the numbers the
/// public endpoint reports back.
#[derive(Debug, Clone)]
pub struct AdmissionOutcome {
    pub registration: Registration,
    pub is_waiting_list: bool,
    pub current_registrations: i64,
    pub max_registrations: i32,
    pub event_name: String,
    pub event_year: i32,
}

#[derive(Debug, Clone)]
pub struct AdmissionEngine {
    pool: PgPool,
    registrations: RegistrationRepository,
}

impl AdmissionEngine {
    pub fn new(pool: PgPool, registrations: RegistrationRepository) -> Self {
        Self {
            pool,
            registrations,
        }
    }

    /// Admit a registrant against the active event.
    ///
    /// Fails with `NoActiveEvent` when no event is active, with
    /// `RegistrationClosed` when the active event is not accepting
    /// registrations, and with `DuplicateEmail`/`Validation` from the insert.
    pub async fn admit(&self, request: CreateRegistrationRequest) -> Result<AdmissionOutcome> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        // Row lock on the active event serializes concurrent admissions
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, year, name, date, max_capacity, is_active, registration_open, waiting_list_enabled, price, venue, address, description, created_at, updated_at FROM events WHERE is_active = TRUE FOR UPDATE"
        )
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SwingRegError::NoActiveEvent)?;

        if !event.registration_open {
            return Err(SwingRegError::RegistrationClosed);
        }

        let occupied = self
            .registrations
            .count_occupied_in_tx(&mut tx, event.id)
            .await?;

        let status = decide(occupied, event.max_capacity, event.waiting_list_enabled);

        let new = NewRegistration {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email: request.normalized_email(),
            phone: request.phone.trim().to_string(),
            experience: request.experience,
            dietary_restrictions: request.dietary_restrictions,
            emergency_contact: request.emergency_contact,
            notes: request.notes,
            payment_status: status,
            // Snapshot of the event at this instant; later edits to the event
            // never reach this registration.
            event_id: event.id,
            event_year: event.year,
            event_date: event.date,
            price: event.price,
        };

        let registration = self.registrations.insert_in_tx(&mut tx, new).await?;

        tx.commit().await?;

        let is_waiting_list = status == PaymentStatus::Waiting;
        info!(
            registration_id = registration.id,
            event_id = event.id,
            occupied = occupied,
            max_capacity = event.max_capacity,
            waiting_list = is_waiting_list,
            "Registration admitted"
        );

        Ok(AdmissionOutcome {
            registration,
            is_waiting_list,
            current_registrations: occupied + 1,
            max_registrations: event.max_capacity,
            event_name: event.name,
            event_year: event.year,
        })
    }
}

/// The admission decision: waitlist when the waiting list is enabled and all
/// seats are occupied, otherwise seat as pending (over capacity goes
/// unenforced when the waiting list is disabled).
pub fn decide(occupied: i64, max_capacity: i32, waiting_list_enabled: bool) -> PaymentStatus {
    if waiting_list_enabled && occupied >= i64::from(max_capacity) {
        PaymentStatus::Waiting
    } else {
        PaymentStatus::Pending
    }
}
