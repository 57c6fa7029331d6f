//! `/api/session` handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{ApiJson, AppState};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{CreateSessionPayload, SessionDetails, UpdateSessionPayload};
use crate::utils::errors::{MessageBody, Result};
use crate::utils::helpers::parse_id;

pub async fn list(_user: AuthUser, State(state): State<AppState>) -> Result<Json<Vec<SessionDetails>>> {
    Ok(Json(state.services.session_registry.list().await?))
}

pub async fn get(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionDetails>> {
    let id = parse_id(&id, "session")?;
    Ok(Json(state.services.session_registry.get(id).await?))
}

pub async fn create(
    AdminUser(user_id): AdminUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateSessionPayload>,
) -> Result<(StatusCode, Json<SessionDetails>)> {
    let session = state.services.session_registry.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn update(
    AdminUser(user_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateSessionPayload>,
) -> Result<Json<SessionDetails>> {
    let id = parse_id(&id, "session")?;
    Ok(Json(state.services.session_registry.update(user_id, id, payload).await?))
}

pub async fn delete(
    AdminUser(user_id): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    let id = parse_id(&id, "session")?;
    state.services.session_registry.delete(user_id, id).await?;
    Ok(Json(MessageBody::new("Session deleted successfully")))
}

pub async fn participate(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<MessageBody>> {
    let (session_id, user_id) = (parse_id(&id, "session")?, parse_id(&user_id, "user")?);
    state.services.session_registry.join(session_id, user_id).await?;
    Ok(Json(MessageBody::new("Successfully joined the session")))
}

pub async fn unparticipate(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<MessageBody>> {
    let (session_id, user_id) = (parse_id(&id, "session")?, parse_id(&user_id, "user")?);
    state.services.session_registry.leave(session_id, user_id).await?;
    Ok(Json(MessageBody::new("Successfully left the session")))
}
