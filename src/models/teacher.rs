//! Teacher model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Teacher as inlined in a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Teacher> for TeacherSummary {
    fn from(teacher: &Teacher) -> Self {
        Self {
            id: teacher.id,
            first_name: teacher.first_name.clone(),
            last_name: teacher.last_name.clone(),
        }
    }
}

/// Seed provisioning only; no API creates teachers
#[derive(Debug, Clone)]
pub struct CreateTeacherRequest {
    pub first_name: String,
    pub last_name: String,
}
