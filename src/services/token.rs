//! Bearer token issue and verification
//!
//! Tokens are HS256 JWTs carrying `{ userId, iat, exp }`. Every way a token
//! can be unusable (malformed, bad signature, expired) collapses to the same
//! `Unauthenticated` outcome.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::settings::MAX_TOKEN_TTL_HOURS;
use crate::config::AuthConfig;
use crate::utils::errors::{StudioError, Result};

pub const INVALID_TOKEN: &str = "Invalid or expired token";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies bearer tokens with the process-wide secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Fails with `Config` when the TTL is not a positive number of hours
    /// up to [`MAX_TOKEN_TTL_HOURS`]
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let ttl = Some(config.token_ttl_hours)
            .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
            .and_then(Duration::try_hours)
            .ok_or_else(|| {
                StudioError::Config(format!("Invalid token TTL: {} hours", config.token_ttl_hours))
            })?;

        Ok(Self::new(&config.jwt_secret, ttl))
    }

    /// Issue a token for a user, valid for the configured TTL
    pub fn issue_token(&self, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.ttl)
                .ok_or_else(|| StudioError::Internal("Token expiry out of range".to_string()))?
                .timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Return the user id embedded in a valid, unexpired token
    pub fn verify_token(&self, token: &str) -> Result<i64> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                StudioError::unauthenticated(INVALID_TOKEN)
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
