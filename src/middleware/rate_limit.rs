//! Rate limiting middleware
//!
//! Throttles login attempts per email address so a single account cannot be
//! brute-forced. Other routes are not limited.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tracing::{debug, warn};

use crate::utils::errors::{StudioError, Result};

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Per-email login limiter; disabled when built with a zero quota
#[derive(Clone)]
pub struct LoginRateLimiter {
    limiter: Option<Arc<KeyedLimiter>>,
}

impl LoginRateLimiter {
    /// `attempts_per_minute == 0` disables limiting
    pub fn new(attempts_per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(attempts_per_minute)
            .map(|burst| Arc::new(RateLimiter::keyed(Quota::per_minute(burst))));

        Self { limiter }
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Record an attempt for `email`, failing once its quota is spent
    pub fn check(&self, email: &str) -> Result<()> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        let key = email.trim().to_lowercase();
        match limiter.check_key(&key) {
            Ok(()) => {
                debug!(email = %key, "Login attempt allowed");
                Ok(())
            }
            Err(_) => {
                warn!(email = %key, "Login rate limit exceeded");
                Err(StudioError::RateLimited)
            }
        }
    }

    /// Drop state for keys whose quota has fully replenished
    pub fn prune(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
        }
    }
}

impl std::fmt::Debug for LoginRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRateLimiter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
