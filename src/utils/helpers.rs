//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use uuid::Uuid;

use crate::utils::errors::{StudioError, Result};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    });
    re.is_match(email)
}

/// Parse a numeric path identifier, e.g. `/api/session/{id}`
pub fn parse_id(raw: &str, label: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| StudioError::validation(format!("Invalid {} ID", label)))
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Only the date part of a timestamp is kept.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| StudioError::validation("Invalid date"))
}

/// Check that a text field length (in characters) lies within bounds
pub fn check_length(value: &str, field: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        return Err(StudioError::validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if len > max {
        return Err(StudioError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Returns the trimmed value, or a "`field` is required" error when it is
/// absent or blank
pub fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(StudioError::validation(format!("{} is required", field))),
    }
}
