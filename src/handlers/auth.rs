//! `/api/auth` handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::{ApiJson, AppState};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::utils::errors::Result;

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    if let Some(email) = request.email.as_deref().filter(|e| !e.trim().is_empty()) {
        state.login_limiter.check(email)?;
    }

    let response = state.services.credential_service.login(request).await?;
    Ok(Json(response))
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let response = state.services.credential_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
