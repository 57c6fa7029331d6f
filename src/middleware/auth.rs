//! Authentication middleware
//!
//! `AuthUser` resolves the `Authorization: Bearer <token>` header before a
//! protected handler runs. Handlers that take it are protected; handlers
//! that don't are public.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::Span;

use crate::handlers::AppState;
use crate::utils::errors::StudioError;

/// Id of the authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = StudioError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A header that is not valid UTF-8 is present but unusable
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());

        let user_id = state.services.authorization.require_authenticated(header)?;
        Span::current().record("user_id", user_id);

        Ok(AuthUser(user_id))
    }
}

/// Authenticated caller that also holds the admin flag.
///
/// Resolved from the request head, so a non-admin is refused before the body
/// is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminUser(pub i64);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = StudioError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        state.services.authorization.require_admin(user_id).await?;

        Ok(AdminUser(user_id))
    }
}
