//! Session model
//!
//! A session is a scheduled class with one teacher and a roster of
//! participating users.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use super::teacher::TeacherSummary;
use crate::utils::errors::{StudioError, Result};
use crate::utils::helpers::{check_length, parse_calendar_date, required};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 2500;

/// Row in the `sessions` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Session {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row in the `participations` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Participation {
    pub session_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Session as returned by the API: teacher inlined, roster as user ids
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
    pub teacher: TeacherSummary,
    pub users: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionDetails {
    pub fn new(session: Session, teacher: TeacherSummary, users: Vec<i64>) -> Self {
        Self {
            id: session.id,
            name: session.name,
            date: session.date,
            description: session.description,
            teacher,
            users,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// `POST /api/session` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionPayload {
    pub name: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub teacher_id: Option<i64>,
}

/// `PUT /api/session/{id}` body; absent fields stay unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionPayload {
    pub name: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub teacher_id: Option<i64>,
}

/// A validated new session
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSessionRequest {
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
    pub teacher_id: i64,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSessionRequest {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub teacher_id: Option<i64>,
}

impl CreateSessionPayload {
    /// Check presence and bounds of every field
    pub fn validate(self) -> Result<CreateSessionRequest> {
        let name = required(self.name.as_deref(), "Name")?;
        let date = required(self.date.as_deref(), "Date")?;
        let description = required(self.description.as_deref(), "Description")?;
        let teacher_id = self
            .teacher_id
            .ok_or_else(|| StudioError::validation("Teacher ID is required"))?;

        check_length(name, "Name", NAME_MIN_LEN, NAME_MAX_LEN)?;
        check_length(description, "Description", 0, DESCRIPTION_MAX_LEN)?;

        Ok(CreateSessionRequest {
            name: name.to_string(),
            date: parse_calendar_date(date)?,
            description: description.to_string(),
            teacher_id,
        })
    }
}

impl UpdateSessionPayload {
    /// Check bounds of the supplied fields; blank strings count as absent
    pub fn validate(self) -> Result<UpdateSessionRequest> {
        let present = |value: Option<String>| {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        let name = present(self.name);
        if let Some(name) = name.as_deref() {
            check_length(name, "Name", NAME_MIN_LEN, NAME_MAX_LEN)?;
        }

        let description = present(self.description);
        if let Some(description) = description.as_deref() {
            check_length(description, "Description", 0, DESCRIPTION_MAX_LEN)?;
        }

        let date = present(self.date)
            .map(|raw| parse_calendar_date(&raw))
            .transpose()?;

        Ok(UpdateSessionRequest {
            name,
            date,
            description,
            teacher_id: self.teacher_id,
        })
    }
}

impl UpdateSessionRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.teacher_id.is_none()
    }
}
