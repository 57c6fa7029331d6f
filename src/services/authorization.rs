//! Authorization gate
//!
//! Decides whether a resolved caller may perform an operation. Apart from
//! the development-only self promotion, nothing here writes.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Environment;
use crate::database::UserStore;
use crate::models::User;
use crate::services::token::TokenService;
use crate::utils::errors::{StudioError, Result};
use crate::utils::logging::log_admin_action;

pub const ADMIN_REQUIRED: &str = "Admin access required";
pub const SELF_REQUIRED: &str = "You can only delete your own account";
pub const PROMOTION_DISABLED: &str = "Admin promotion is only available in development";

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct AuthorizationGate {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    environment: Environment,
}

impl AuthorizationGate {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService, environment: Environment) -> Self {
        Self {
            users,
            tokens,
            environment,
        }
    }

    /// Resolve an `Authorization` header value to a user id
    pub fn require_authenticated(&self, header: Option<&str>) -> Result<i64> {
        let header = header.ok_or_else(|| StudioError::unauthenticated("No token provided"))?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| StudioError::unauthenticated("Invalid token format"))?;

        self.tokens.verify_token(token)
    }

    /// Fails `Forbidden` unless the user exists and is an admin
    pub async fn require_admin(&self, user_id: i64) -> Result<User> {
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.admin => {
                debug!(user_id, "Admin access granted");
                Ok(user)
            }
            Some(_) => {
                warn!(user_id, "Non-admin attempted an admin operation");
                Err(StudioError::forbidden(ADMIN_REQUIRED))
            }
            None => {
                warn!(user_id, "Unknown user attempted an admin operation");
                Err(StudioError::forbidden(ADMIN_REQUIRED))
            }
        }
    }

    /// Fails `Forbidden` when a user acts on another user's account
    pub fn require_self(&self, requesting_user_id: i64, target_user_id: i64) -> Result<()> {
        if requesting_user_id != target_user_id {
            warn!(
                requesting_user_id,
                target_user_id, "Attempt to act on another user's account"
            );
            return Err(StudioError::forbidden(SELF_REQUIRED));
        }
        Ok(())
    }

    /// Whether the development-only escape hatches are open
    pub fn development_mode(&self) -> bool {
        self.environment.is_development()
    }

    /// Grant admin rights to the caller. Only outside production-like
    /// environments.
    pub async fn promote_self_to_admin(&self, user_id: i64) -> Result<User> {
        if !self.development_mode() {
            warn!(user_id, environment = %self.environment, "Admin promotion refused");
            return Err(StudioError::forbidden(PROMOTION_DISABLED));
        }

        let user = self
            .users
            .set_admin(user_id, true)
            .await?
            .ok_or_else(|| StudioError::not_found("User not found"))?;

        log_admin_action(user_id, "promote_self_to_admin", Some(user_id), None);
        Ok(user)
    }
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
