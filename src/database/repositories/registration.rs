//! Registration repository implementation

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;

use crate::models::event::EventSummary;
use crate::models::registration::{
    ExperienceCount, NewRegistration, Pagination, PaymentStatus, Registration, RegistrationFilter,
    RegistrationPage, RegistrationWithEvent, StatsFilter, StatusCounts,
};
use crate::utils::errors::SwingRegError;
use crate::utils::helpers;

const REGISTRATION_COLUMNS: &str = "id, first_name, last_name, email, phone, experience, dietary_restrictions, emergency_contact, notes, payment_status, event_id, event_year, event_date, price, registration_date, created_at, updated_at";

/// Name of the case-insensitive unique index on registrations.email
const EMAIL_UNIQUE_INDEX: &str = "registrations_email_lower_idx";

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a registration inside an open transaction.
    ///
    /// The admission engine calls this while holding the active-event row
    /// lock, so the seat count it decided on cannot change underneath it.
    pub async fn insert_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        new: NewRegistration,
    ) -> Result<Registration, SwingRegError> {
        let email = helpers::normalize_email(&new.email);
        let now = Utc::now();

        let result = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO registrations (first_name, last_name, email, phone, experience, dietary_restrictions, emergency_contact, notes, payment_status, event_id, event_year, event_date, price, registration_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(&email)
        .bind(new.phone)
        .bind(new.experience)
        .bind(new.dietary_restrictions)
        .bind(new.emergency_contact.map(Json))
        .bind(new.notes)
        .bind(new.payment_status)
        .bind(new.event_id)
        .bind(new.event_year)
        .bind(new.event_date)
        .bind(new.price)
        .bind(now)
        .bind(now)
        .bind(now)
        .fetch_one(&mut **tx)
        .await;

        result.map_err(|e| Self::map_unique_violation(e, email))
    }

    /// Count occupied seats for an event: registrations whose status is
    /// neither cancelled nor waiting. Runs on the caller's transaction so the
    /// count is taken under the event row lock.
    pub async fn count_occupied_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<i64, SwingRegError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND payment_status NOT IN ('cancelled', 'waiting')"
        )
        .bind(event_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(count)
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, SwingRegError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// List registrations matching the filter, newest first, with offset
    /// pagination and each row's event summary attached.
    pub async fn find(
        &self,
        filter: &RegistrationFilter,
        page: i64,
        page_size: i64,
    ) -> Result<RegistrationPage, SwingRegError> {
        let search_pattern = filter
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("%{}%", helpers::escape_like_pattern(s.trim())));
        let offset = helpers::calculate_offset(page, page_size);

        let registrations = sqlx::query_as::<_, Registration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS} FROM registrations
            WHERE ($1::text IS NULL OR first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1)
              AND ($2::payment_status IS NULL OR payment_status = $2)
              AND ($3::experience_level IS NULL OR experience = $3)
            ORDER BY registration_date DESC, id DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(&search_pattern)
        .bind(filter.status)
        .bind(filter.experience)
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let (total_records,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM registrations
            WHERE ($1::text IS NULL OR first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1)
              AND ($2::payment_status IS NULL OR payment_status = $2)
              AND ($3::experience_level IS NULL OR experience = $3)
            "#,
        )
        .bind(&search_pattern)
        .bind(filter.status)
        .bind(filter.experience)
        .fetch_one(&self.pool)
        .await?;

        let events = self.event_summaries(&registrations).await?;
        let registrations = registrations
            .into_iter()
            .map(|registration| {
                let event = registration
                    .event_id
                    .and_then(|id| events.get(&id).cloned());
                RegistrationWithEvent {
                    registration,
                    event,
                }
            })
            .collect();

        Ok(RegistrationPage {
            registrations,
            pagination: Pagination::new(page, page_size, total_records),
        })
    }

    /// Per-status counts, optionally narrowed to one event or year
    pub async fn status_counts(&self, filter: &StatsFilter) -> Result<StatusCounts, SwingRegError> {
        let rows: Vec<(PaymentStatus, i64)> = sqlx::query_as(
            r#"
            SELECT payment_status, COUNT(*) FROM registrations
            WHERE ($1::bigint IS NULL OR event_id = $1)
              AND ($2::int IS NULL OR event_year = $2)
            GROUP BY payment_status
            "#,
        )
        .bind(filter.event_id)
        .bind(filter.event_year)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            counts.total += count;
            match status {
                PaymentStatus::Paid => counts.paid = count,
                PaymentStatus::Pending => counts.pending = count,
                PaymentStatus::Cancelled => counts.cancelled = count,
                PaymentStatus::Waiting => counts.waiting = count,
            }
        }
        counts.total_registrations = counts.paid + counts.pending;

        Ok(counts)
    }

    /// Registration counts grouped by experience level
    pub async fn experience_counts(
        &self,
        filter: &StatsFilter,
    ) -> Result<Vec<ExperienceCount>, SwingRegError> {
        let rows = sqlx::query_as::<_, ExperienceCount>(
            r#"
            SELECT experience, COUNT(*) AS count FROM registrations
            WHERE ($1::bigint IS NULL OR event_id = $1)
              AND ($2::int IS NULL OR event_year = $2)
            GROUP BY experience
            ORDER BY count DESC
            "#,
        )
        .bind(filter.event_id)
        .bind(filter.event_year)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Most recent registrations, optionally narrowed to one event or year
    pub async fn recent(
        &self,
        filter: &StatsFilter,
        limit: i64,
    ) -> Result<Vec<Registration>, SwingRegError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS} FROM registrations
            WHERE ($1::bigint IS NULL OR event_id = $1)
              AND ($2::int IS NULL OR event_year = $2)
            ORDER BY registration_date DESC, id DESC
            LIMIT $3
            "#
        ))
        .bind(filter.event_id)
        .bind(filter.event_year)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Update payment status. Snapshot fields are never touched here.
    pub async fn update_status(
        &self,
        id: i64,
        status: PaymentStatus,
    ) -> Result<Registration, SwingRegError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "UPDATE registrations SET payment_status = $2, updated_at = $3 WHERE id = $1 RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SwingRegError::RegistrationNotFound {
            registration_id: id,
        })?;

        Ok(registration)
    }

    /// Delete a registration
    pub async fn delete(&self, id: i64) -> Result<(), SwingRegError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SwingRegError::RegistrationNotFound {
                registration_id: id,
            });
        }

        Ok(())
    }

    /// Fetch event summaries for the distinct event ids in the given page
    async fn event_summaries(
        &self,
        registrations: &[Registration],
    ) -> Result<HashMap<i64, EventSummary>, SwingRegError> {
        let mut event_ids: Vec<i64> = registrations
            .iter()
            .filter_map(|r| r.event_id)
            .collect();
        event_ids.sort_unstable();
        event_ids.dedup();

        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let summaries = sqlx::query_as::<_, EventSummary>(
            "SELECT id, name, year, date FROM events WHERE id = ANY($1)",
        )
        .bind(&event_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries.into_iter().map(|s| (s.id, s)).collect())
    }

    /// Translate a unique-index violation on the email column into the
    /// domain's DuplicateEmail error; everything else passes through.
    fn map_unique_violation(error: sqlx::Error, email: String) -> SwingRegError {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.constraint() == Some(EMAIL_UNIQUE_INDEX) {
                return SwingRegError::DuplicateEmail { email };
            }
        }
        SwingRegError::Database(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_unique_violation_passes_through_other_errors() {
        let err = RegistrationRepository::map_unique_violation(
            sqlx::Error::RowNotFound,
            "a@b.fi".to_string(),
        );
        assert!(matches!(err, SwingRegError::Database(_)));
    }
}
