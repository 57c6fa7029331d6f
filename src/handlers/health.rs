//! Liveness probe

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use super::AppState;
use crate::utils::errors::Result;

/// 200 once the store answers a ping
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
    state.services.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}
