//! User service implementation
//!
//! Profile lookup, self-service account deletion and the development-only
//! admin promotion.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::UserStore;
use crate::models::User;
use crate::services::authorization::AuthorizationGate;
use crate::utils::errors::{StudioError, Result};

const USER_NOT_FOUND: &str = "User not found";

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    gate: AuthorizationGate,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(users: Arc<dyn UserStore>, gate: AuthorizationGate) -> Self {
        Self { users, gate }
    }

    /// Get user by ID
    pub async fn get(&self, user_id: i64) -> Result<User> {
        debug!(user_id = user_id, "Getting user by ID");
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| StudioError::not_found(USER_NOT_FOUND))
    }

    /// Delete an account. Only its owner may do this; participations go
    /// with it.
    pub async fn delete(&self, requesting_user_id: i64, user_id: i64) -> Result<()> {
        self.gate.require_self(requesting_user_id, user_id)?;

        if !self.users.delete(user_id).await? {
            return Err(StudioError::not_found(USER_NOT_FOUND));
        }

        info!(user_id = user_id, "User account deleted");
        Ok(())
    }

    pub async fn promote_self_to_admin(&self, requesting_user_id: i64) -> Result<User> {
        self.gate.promote_self_to_admin(requesting_user_id).await
    }
}
