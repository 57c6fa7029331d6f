//! `/api/user` handlers

use axum::extract::{Path, State};
use axum::Json;

use super::AppState;
use crate::middleware::AuthUser;
use crate::models::User;
use crate::utils::errors::{MessageBody, Result};
use crate::utils::helpers::parse_id;

pub async fn get(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    let id = parse_id(&id, "user")?;
    Ok(Json(state.services.user_service.get(id).await?))
}

pub async fn delete(
    AuthUser(requesting_user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    let id = parse_id(&id, "user")?;
    state.services.user_service.delete(requesting_user_id, id).await?;
    Ok(Json(MessageBody::new("User deleted successfully")))
}

pub async fn promote_self_to_admin(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>> {
    Ok(Json(state.services.user_service.promote_self_to_admin(user_id).await?))
}
