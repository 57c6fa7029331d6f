//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::utils::errors::{StudioError, Result};
use crate::utils::helpers::{check_length, is_valid_email, required};

pub const PASSWORD_MIN_LEN: usize = 8;
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated registration, password already hashed
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
}

/// `POST /api/auth/register` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// `POST /api/auth/login` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration that passed boundary checks; password still in clear
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<ValidRegistration> {
        let email = required(self.email.as_deref(), "Email")?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| StudioError::validation("Password is required"))?;
        let first_name = required(self.first_name.as_deref(), "First name")?;
        let last_name = required(self.last_name.as_deref(), "Last name")?;

        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(StudioError::validation(format!(
                "Password must be at least {} characters",
                PASSWORD_MIN_LEN
            )));
        }
        if !is_valid_email(email) {
            return Err(StudioError::validation("Invalid email"));
        }
        check_length(first_name, "First name", NAME_MIN_LEN, NAME_MAX_LEN)?;
        check_length(last_name, "Last name", NAME_MIN_LEN, NAME_MAX_LEN)?;

        Ok(ValidRegistration {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }
}

impl LoginRequest {
    /// Presence checks only; everything else is an invalid credential
    pub fn validate(self) -> Result<(String, String)> {
        let email = required(self.email.as_deref(), "Email")?.to_string();
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| StudioError::validation("Password is required"))?;
        Ok((email, password))
    }
}

/// Profile plus bearer token, returned by login and registration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            admin: user.admin,
            token,
        }
    }
}
