//! Event management handlers
//!
//! The active-event lookup is public; everything else requires an admin token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::middleware::auth::AdminClaims;
use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

/// `GET /api/events` (admin)
pub async fn list_events(
    _claims: AdminClaims,
    State(state): State<AppState>,
) -> Result<Json<Vec<Event>>> {
    let events = state.db.events.list_all().await?;
    Ok(Json(events))
}

/// `GET /api/events/active` (public)
pub async fn active_event(State(state): State<AppState>) -> Result<Response> {
    match state.db.events.find_active().await? {
        Some(event) => Ok(Json(event).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({"message": "No active event found"})),
        )
            .into_response()),
    }
}

/// `GET /api/events/{id}` (admin)
pub async fn get_event(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Event>> {
    let event = state
        .db
        .events
        .find_by_id(id)
        .await?
        .ok_or(crate::utils::errors::SwingRegError::EventNotFound { event_id: id })?;

    Ok(Json(event))
}

/// `POST /api/events` (admin)
pub async fn create_event(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let event = state.db.events.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Event created successfully",
            "event": event,
        })),
    ))
}

/// `PATCH /api/events/{id}` (admin)
pub async fn update_event(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Value>> {
    let event = state.db.events.update(id, request).await?;

    Ok(Json(json!({
        "message": "Event updated successfully",
        "event": event,
    })))
}

/// `DELETE /api/events/{id}` (admin)
pub async fn delete_event(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    state.db.events.delete(id).await?;

    Ok(Json(json!({"message": "Event deleted successfully"})))
}

/// `PATCH /api/events/{id}/activate` (admin)
pub async fn activate_event(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let event = state.db.events.activate(id).await?;

    Ok(Json(json!({
        "message": "Event activated successfully",
        "event": event,
    })))
}
