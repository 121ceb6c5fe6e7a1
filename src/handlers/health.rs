//! Health check handler

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::database;
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>> {
    database::health_check(&state.pool).await?;

    Ok(Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}
