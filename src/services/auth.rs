//! Credential service implementation
//!
//! Registration and login. Registration reveals a taken email ("Email
//! already exists"); login never reveals whether the email or the password
//! was wrong.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::UserStore;
use crate::models::user::{AuthResponse, CreateUserRequest, LoginRequest, RegisterRequest, User};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenService;
use crate::utils::errors::{StudioError, Result};
use crate::utils::logging::log_auth_event;

/// Credential store and verifier
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl CredentialService {
    /// Create a new CredentialService instance
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    /// Register a new, non-admin user and sign them in
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        let registration = request.validate()?;
        debug!(email = %registration.email, "Attempting registration");

        if self.users.find_by_email(&registration.email).await?.is_some() {
            log_auth_event(None, "register", false, Some("email already exists"));
            return Err(StudioError::conflict("Email already exists"));
        }

        let password_hash = hash_password(&registration.password, self.bcrypt_cost).await?;

        let user = self
            .users
            .create(CreateUserRequest {
                email: registration.email,
                password_hash,
                first_name: registration.first_name,
                last_name: registration.last_name,
                admin: false,
            })
            .await?;

        let token = self.tokens.issue_token(user.id)?;
        log_auth_event(Some(user.id), "register", true, None);
        info!(user_id = user.id, "New user registered successfully");

        Ok(AuthResponse::new(&user, token))
    }

    /// Check credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let (email, password) = request.validate()?;

        let user = self.verify_credentials(&email, &password).await?;
        let token = self.tokens.issue_token(user.id)?;
        log_auth_event(Some(user.id), "login", true, None);

        Ok(AuthResponse::new(&user, token))
    }

    /// Both "no such email" and "wrong password" yield `InvalidCredentials`
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User> {
        let Some(user) = self.users.find_by_email(email).await? else {
            log_auth_event(None, "login", false, Some("unknown email"));
            return Err(StudioError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash).await? {
            log_auth_event(Some(user.id), "login", false, Some("password mismatch"));
            return Err(StudioError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Issue a token for an already-known user id
    pub fn issue_token(&self, user_id: i64) -> Result<String> {
        self.tokens.issue_token(user_id)
    }

    /// Resolve a token to the user id it was issued for
    pub fn verify_token(&self, token: &str) -> Result<i64> {
        self.tokens.verify_token(token)
    }
}
