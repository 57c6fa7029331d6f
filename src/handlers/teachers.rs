//! `/api/teacher` handlers

use axum::extract::{Path, State};
use axum::Json;

use super::AppState;
use crate::middleware::AuthUser;
use crate::models::Teacher;
use crate::utils::errors::Result;
use crate::utils::helpers::parse_id;

pub async fn list(_user: AuthUser, State(state): State<AppState>) -> Result<Json<Vec<Teacher>>> {
    Ok(Json(state.services.teacher_directory.list().await?))
}

pub async fn get(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Teacher>> {
    let id = parse_id(&id, "teacher")?;
    Ok(Json(state.services.teacher_directory.get(id).await?))
}
