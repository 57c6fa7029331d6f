//! Session repository implementation
//!
//! Owns both the `sessions` catalog and the `participations` roster. The
//! roster's primary key on `(session_id, user_id)` is what actually keeps a
//! user from joining twice; a violation surfaces as `Conflict`.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use crate::models::session::{Session, Participation, CreateSessionRequest, UpdateSessionRequest};
use crate::utils::errors::{constraint_of, Result};
use super::{map_constraint_violation, SessionStore};

const SESSION_COLUMNS: &str = "id, name, date, description, teacher_id, created_at, updated_at";

pub const ALREADY_PARTICIPATING: &str = "User already participating in this session";

/// Default name Postgres gives the `participations.user_id` reference
const PARTICIPATION_USER_FKEY: &str = "participations_user_id_fkey";

#[derive(Clone, Debug)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by name and date (seed provisioning)
    pub async fn find_by_name_and_date(&self, name: &str, date: chrono::NaiveDate) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE name = $1 AND date = $2 ORDER BY id ASC LIMIT 1"
        ))
        .bind(name)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create(&self, request: CreateSessionRequest) -> Result<Session> {
        sqlx::query_as::<_, Session>(&format!(
            r#"
            INSERT INTO sessions (name, date, description, teacher_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.date)
        .bind(request.description)
        .bind(request.teacher_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Session already exists", "Teacher not found"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn list(&self) -> Result<Vec<Session>> {
        let sessions = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn update(&self, id: i64, request: UpdateSessionRequest) -> Result<Option<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            r#"
            UPDATE sessions
            SET name = COALESCE($2, name),
                date = COALESCE($3, date),
                description = COALESCE($4, description),
                teacher_id = COALESCE($5, teacher_id),
                updated_at = $6
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.date)
        .bind(request.description)
        .bind(request.teacher_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Session already exists", "Teacher not found"))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn participants(&self, session_id: i64) -> Result<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT user_id FROM participations WHERE session_id = $1 ORDER BY created_at ASC, user_id ASC"
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

    async fn all_participants(&self) -> Result<HashMap<i64, Vec<i64>>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT session_id, user_id FROM participations ORDER BY session_id ASC, created_at ASC, user_id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        let mut roster: HashMap<i64, Vec<i64>> = HashMap::new();
        for (session_id, user_id) in rows {
            roster.entry(session_id).or_default().push(user_id);
        }

        Ok(roster)
    }

    async fn is_participating(&self, session_id: i64, user_id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM participations WHERE session_id = $1 AND user_id = $2"
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    async fn add_participant(&self, session_id: i64, user_id: i64) -> Result<Participation> {
        sqlx::query_as::<_, Participation>(
            r#"
            INSERT INTO participations (session_id, user_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING session_id, user_id, created_at
            "#
        )
        .bind(session_id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let missing = if constraint_of(&e).as_deref() == Some(PARTICIPATION_USER_FKEY) {
                "User not found"
            } else {
                "Session not found"
            };
            map_constraint_violation(e, ALREADY_PARTICIPATING, missing)
        })
    }

    async fn remove_participant(&self, session_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM participations WHERE session_id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
