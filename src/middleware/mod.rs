//! Middleware module
//!
//! This module contains middleware for request processing

pub mod auth;
pub mod logging;
pub mod rate_limit;

// Re-export commonly used middleware
pub use auth::{AdminUser, AuthUser};
pub use logging::{propagate_request_id_layer, set_request_id_layer, trace_layer, REQUEST_ID_HEADER};
pub use rate_limit::LoginRateLimiter;
