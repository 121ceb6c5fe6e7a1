//! Event repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::errors::SwingRegError;

const EVENT_COLUMNS: &str = "id, year, name, date, max_capacity, is_active, registration_open, waiting_list_enabled, price, venue, address, description, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event. New events are never active; activation is a
    /// separate operation so the single-active invariant has one writer.
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, SwingRegError> {
        request.validate()?;

        let now = Utc::now();
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (year, name, date, max_capacity, registration_open, waiting_list_enabled, price, venue, address, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.year)
        .bind(request.name)
        .bind(request.date)
        .bind(request.max_capacity)
        .bind(request.registration_open)
        .bind(request.waiting_list_enabled)
        .bind(request.price)
        .bind(request.venue)
        .bind(request.address)
        .bind(request.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, SwingRegError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Get the single active event, if any
    pub async fn find_active(&self) -> Result<Option<Event>, SwingRegError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE is_active = TRUE"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find the most recent event for a given year
    pub async fn find_by_year(&self, year: i32) -> Result<Option<Event>, SwingRegError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE year = $1 ORDER BY id DESC LIMIT 1"
        ))
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// List all events, newest year first
    pub async fn list_all(&self) -> Result<Vec<Event>, SwingRegError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY year DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Update event fields.
    ///
    /// Setting `is_active` to true deactivates every other event inside the
    /// same transaction, so two concurrent writers cannot commit two active
    /// events.
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, SwingRegError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        if request.is_active == Some(true) {
            sqlx::query("UPDATE events SET is_active = FALSE, updated_at = $2 WHERE is_active = TRUE AND id <> $1")
                .bind(id)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
        }

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET year = COALESCE($2, year),
                name = COALESCE($3, name),
                date = COALESCE($4, date),
                max_capacity = COALESCE($5, max_capacity),
                is_active = COALESCE($6, is_active),
                registration_open = COALESCE($7, registration_open),
                waiting_list_enabled = COALESCE($8, waiting_list_enabled),
                price = COALESCE($9, price),
                venue = COALESCE($10, venue),
                address = COALESCE($11, address),
                description = COALESCE($12, description),
                updated_at = $13
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.year)
        .bind(request.name)
        .bind(request.date)
        .bind(request.max_capacity)
        .bind(request.is_active)
        .bind(request.registration_open)
        .bind(request.waiting_list_enabled)
        .bind(request.price)
        .bind(request.venue)
        .bind(request.address)
        .bind(request.description)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SwingRegError::EventNotFound { event_id: id })?;

        tx.commit().await?;

        Ok(event)
    }

    /// Delete an event. Existing registrations keep their snapshot fields;
    /// nothing cascades.
    pub async fn delete(&self, id: i64) -> Result<(), SwingRegError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SwingRegError::EventNotFound { event_id: id });
        }

        Ok(())
    }

    /// Make the given event the active one.
    ///
    /// The deactivate-others step and the activation itself run in one
    /// transaction; concurrent activations serialize on the row updates and
    /// the loser sees the winner's committed state.
    pub async fn activate(&self, id: i64) -> Result<Event, SwingRegError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE events SET is_active = FALSE, updated_at = $2 WHERE is_active = TRUE AND id <> $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET is_active = TRUE, updated_at = $2 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SwingRegError::EventNotFound { event_id: id })?;

        tx.commit().await?;

        Ok(event)
    }
}
