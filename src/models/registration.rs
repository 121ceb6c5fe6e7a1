//! Registration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::models::event::EventSummary;
use crate::utils::errors::{Result, SwingRegError};
use crate::utils::helpers;

/// Payment status of a registration.
///
/// `waiting` and `cancelled` registrations do not count toward event capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
    Waiting,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Waiting => "waiting",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PaymentStatus {
    type Err = SwingRegError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            "waiting" => Ok(PaymentStatus::Waiting),
            other => Err(SwingRegError::Validation(format!(
                "Payment status must be pending, paid, cancelled, or waiting (got '{}')",
                other
            ))),
        }
    }
}

/// Self-reported dance experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "experience_level", rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ExperienceLevel {
    type Err = SwingRegError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            other => Err(SwingRegError::Validation(format!(
                "Experience must be beginner, intermediate, or advanced (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub experience: ExperienceLevel,
    pub dietary_restrictions: Option<String>,
    pub emergency_contact: Option<Json<EmergencyContact>>,
    pub notes: Option<String>,
    pub payment_status: PaymentStatus,
    // Snapshot of the event this registration was created against. Immutable
    // after creation; later event edits or deletion do not touch these.
    pub event_id: Option<i64>,
    pub event_year: Option<i32>,
    pub event_date: DateTime<Utc>,
    pub price: f64,
    pub registration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration record with its embedded event summary, as served to admins
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationWithEvent {
    #[serde(flatten)]
    pub registration: Registration,
    pub event: Option<EventSummary>,
}

/// Public registration form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub experience: ExperienceLevel,
    pub dietary_restrictions: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub notes: Option<String>,
}

impl CreateRegistrationRequest {
    pub fn validate(&self) -> Result<()> {
        validate_person_name("First name", &self.first_name)?;
        validate_person_name("Last name", &self.last_name)?;

        let email = helpers::normalize_email(&self.email);
        if !helpers::is_valid_email(&email) {
            return Err(SwingRegError::Validation(
                "Please enter a valid email".to_string(),
            ));
        }

        if self.phone.trim().is_empty() {
            return Err(SwingRegError::Validation(
                "Phone number is required".to_string(),
            ));
        }

        if let Some(dietary) = &self.dietary_restrictions {
            if dietary.chars().count() > 200 {
                return Err(SwingRegError::Validation(
                    "Dietary restrictions cannot exceed 200 characters".to_string(),
                ));
            }
        }

        if let Some(notes) = &self.notes {
            if notes.chars().count() > 500 {
                return Err(SwingRegError::Validation(
                    "Notes cannot exceed 500 characters".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Email normalized for storage; the unique index compares lowercased
    pub fn normalized_email(&self) -> String {
        helpers::normalize_email(&self.email)
    }
}

fn validate_person_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SwingRegError::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > 50 {
        return Err(SwingRegError::Validation(format!(
            "{} cannot exceed 50 characters",
            field
        )));
    }
    Ok(())
}

/// Fully-resolved registration row ready for insertion: form fields plus the
/// admission decision and the event snapshot
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub experience: ExperienceLevel,
    pub dietary_restrictions: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub notes: Option<String>,
    pub payment_status: PaymentStatus,
    pub event_id: i64,
    pub event_year: i32,
    pub event_date: DateTime<Utc>,
    pub price: f64,
}

/// Filter for admin registration listings
#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub search: Option<String>,
    pub status: Option<PaymentStatus>,
    pub experience: Option<ExperienceLevel>,
}

/// Filter for the statistics overview
#[derive(Debug, Clone, Default)]
pub struct StatsFilter {
    pub event_id: Option<i64>,
    pub event_year: Option<i32>,
}

/// One page of registration records
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationPage {
    pub registrations: Vec<RegistrationWithEvent>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub current: i64,
    pub total: i64,
    pub total_records: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, page_size: i64, total_records: i64) -> Self {
        let total = if page_size > 0 {
            (total_records + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            current: page,
            total,
            total_records,
            has_next: page * page_size < total_records,
            has_prev: page > 1,
        }
    }
}

/// Per-status registration counts for an event
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusCounts {
    pub total: i64,
    pub paid: i64,
    pub pending: i64,
    pub cancelled: i64,
    pub waiting: i64,
    /// Occupied seats: registrations that are neither cancelled nor waiting
    pub total_registrations: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExperienceCount {
    pub experience: ExperienceLevel,
    pub count: i64,
}
