//! Registration handlers
//!
//! Registration submission is public; listing, status changes, deletion, and
//! statistics require an admin token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::auth::AdminClaims;
use crate::models::registration::{
    CreateRegistrationRequest, Registration, RegistrationFilter, RegistrationPage, StatsFilter,
};
use crate::state::AppState;
use crate::utils::errors::{Result, SwingRegError};

/// `POST /api/registrations` (public)
pub async fn create_registration(
    State(state): State<AppState>,
    Json(request): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let receipt = state.services.registrations.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": receipt.message,
            "registration": receipt.registration,
            "is_waiting_list": receipt.is_waiting_list,
            "current_registrations": receipt.current_registrations,
            "max_registrations": receipt.max_registrations,
            "event_name": receipt.event_name,
            "event_year": receipt.event_year,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub experience: Option<String>,
}

/// `GET /api/registrations` (admin)
pub async fn list_registrations(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<RegistrationPage>> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.limit.unwrap_or(10).clamp(1, 100);

    let filter = RegistrationFilter {
        search: params.search.filter(|s| !s.trim().is_empty()),
        status: parse_optional(params.status)?,
        experience: parse_optional(params.experience)?,
    };

    let result = state
        .db
        .registrations
        .find(&filter, page, page_size)
        .await?;

    Ok(Json(result))
}

/// `GET /api/registrations/{id}` (admin)
pub async fn get_registration(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Registration>> {
    let registration = state
        .db
        .registrations
        .find_by_id(id)
        .await?
        .ok_or(SwingRegError::RegistrationNotFound {
            registration_id: id,
        })?;

    Ok(Json(registration))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub payment_status: Option<String>,
}

/// `PATCH /api/registrations/{id}/status` (admin)
pub async fn update_status(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>> {
    let status = request
        .payment_status
        .as_deref()
        .ok_or_else(|| {
            SwingRegError::Validation(
                "Valid payment status required (pending, paid, cancelled, waiting)".to_string(),
            )
        })?
        .parse()?;

    let registration = state.services.registrations.set_status(id, status).await?;

    Ok(Json(json!({
        "message": "Status updated successfully",
        "registration": registration,
    })))
}

/// `DELETE /api/registrations/{id}` (admin)
pub async fn delete_registration(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    state.db.registrations.delete(id).await?;

    Ok(Json(json!({"message": "Registration deleted successfully"})))
}

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub event_id: Option<i64>,
    pub event_year: Option<i32>,
}

/// `GET /api/registrations/stats/overview` (admin)
pub async fn stats_overview(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<Value>> {
    let filter = StatsFilter {
        event_id: params.event_id,
        event_year: params.event_year,
    };

    let counts = state.db.registrations.status_counts(&filter).await?;
    let experience_stats = state.db.registrations.experience_counts(&filter).await?;
    let recent_registrations = state.db.registrations.recent(&filter, 5).await?;

    let event_details = match (filter.event_id, filter.event_year) {
        (Some(event_id), _) => state.db.events.find_by_id(event_id).await?,
        (None, Some(year)) => state.db.events.find_by_year(year).await?,
        (None, None) => None,
    };

    Ok(Json(json!({
        "total": counts.total,
        "paid": counts.paid,
        "pending": counts.pending,
        "cancelled": counts.cancelled,
        "waiting": counts.waiting,
        "total_registrations": counts.total_registrations,
        "max_registrations": event_details.as_ref().map(|e| e.max_capacity),
        "experience_stats": experience_stats,
        "recent_registrations": recent_registrations,
        "event_details": event_details,
    })))
}

fn parse_optional<T: std::str::FromStr<Err = SwingRegError>>(
    value: Option<String>,
) -> Result<Option<T>> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse())
        .transpose()
}
