//! Session registry
//!
//! Catalog operations (admin-gated writes) and the participation roster.
//! The roster's `(session, user)` primary key is the real uniqueness
//! enforcer; the existence and duplicate checks here only produce the
//! friendlier outcome first.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::database::repositories::session::ALREADY_PARTICIPATING;
use crate::database::{SessionStore, TeacherStore, UserStore};
use crate::models::{
    CreateSessionPayload, Session, SessionDetails, TeacherSummary, UpdateSessionPayload,
};
use crate::services::authorization::AuthorizationGate;
use crate::utils::errors::{StudioError, Result};
use crate::utils::logging::{log_admin_action, log_participation_change};

const SESSION_NOT_FOUND: &str = "Session not found";
const TEACHER_NOT_FOUND: &str = "Teacher not found";

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<dyn SessionStore>,
    teachers: Arc<dyn TeacherStore>,
    users: Arc<dyn UserStore>,
    gate: AuthorizationGate,
}

impl SessionRegistry {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        teachers: Arc<dyn TeacherStore>,
        users: Arc<dyn UserStore>,
        gate: AuthorizationGate,
    ) -> Self {
        Self {
            sessions,
            teachers,
            users,
            gate,
        }
    }

    /// Every session, teacher inlined, ordered by id
    pub async fn list(&self) -> Result<Vec<SessionDetails>> {
        let sessions = self.sessions.list().await?;
        let teachers: HashMap<i64, TeacherSummary> = self
            .teachers
            .list()
            .await?
            .iter()
            .map(|t| (t.id, TeacherSummary::from(t)))
            .collect();
        let mut rosters = self.sessions.all_participants().await?;

        sessions
            .into_iter()
            .map(|session| {
                let teacher = teachers.get(&session.teacher_id).cloned().ok_or_else(|| {
                    StudioError::Internal(format!(
                        "Session {} references missing teacher {}",
                        session.id, session.teacher_id
                    ))
                })?;
                let users = rosters.remove(&session.id).unwrap_or_default();
                Ok(SessionDetails::new(session, teacher, users))
            })
            .collect()
    }

    pub async fn get(&self, id: i64) -> Result<SessionDetails> {
        let session = self
            .sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| StudioError::not_found(SESSION_NOT_FOUND))?;
        self.details(session).await
    }

    /// Admin only. Every field is required.
    pub async fn create(&self, requesting_user_id: i64, payload: CreateSessionPayload) -> Result<SessionDetails> {
        self.gate.require_admin(requesting_user_id).await?;
        let request = payload.validate()?;

        self.require_teacher(request.teacher_id).await?;

        let session = self.sessions.create(request).await?;
        log_admin_action(requesting_user_id, "create_session", Some(session.id), Some(&session.name));

        self.details(session).await
    }

    /// Admin only. Absent fields keep their current value.
    pub async fn update(
        &self,
        requesting_user_id: i64,
        id: i64,
        payload: UpdateSessionPayload,
    ) -> Result<SessionDetails> {
        self.gate.require_admin(requesting_user_id).await?;
        let request = payload.validate()?;

        let existing = self
            .sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| StudioError::not_found(SESSION_NOT_FOUND))?;

        if request.is_empty() {
            debug!(session_id = id, "Empty session update");
            return self.details(existing).await;
        }

        if let Some(teacher_id) = request.teacher_id {
            self.require_teacher(teacher_id).await?;
        }

        let session = self
            .sessions
            .update(id, request)
            .await?
            .ok_or_else(|| StudioError::not_found(SESSION_NOT_FOUND))?;
        log_admin_action(requesting_user_id, "update_session", Some(id), None);

        self.details(session).await
    }

    /// Admin only. The roster goes with the session.
    pub async fn delete(&self, requesting_user_id: i64, id: i64) -> Result<()> {
        self.gate.require_admin(requesting_user_id).await?;

        if !self.sessions.delete(id).await? {
            return Err(StudioError::not_found(SESSION_NOT_FOUND));
        }
        log_admin_action(requesting_user_id, "delete_session", Some(id), None);

        Ok(())
    }

    /// Add a user to a session's roster
    pub async fn join(&self, session_id: i64, user_id: i64) -> Result<()> {
        if self.sessions.find_by_id(session_id).await?.is_none() {
            return Err(StudioError::not_found(SESSION_NOT_FOUND));
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(StudioError::not_found("User not found"));
        }
        if self.sessions.is_participating(session_id, user_id).await? {
            return Err(StudioError::conflict(ALREADY_PARTICIPATING));
        }

        self.sessions.add_participant(session_id, user_id).await?;
        log_participation_change(session_id, user_id, "join");

        Ok(())
    }

    /// Remove a user from a session's roster
    pub async fn leave(&self, session_id: i64, user_id: i64) -> Result<()> {
        if !self.sessions.remove_participant(session_id, user_id).await? {
            return Err(StudioError::not_found("Participation not found"));
        }
        log_participation_change(session_id, user_id, "leave");

        Ok(())
    }

    async fn require_teacher(&self, teacher_id: i64) -> Result<TeacherSummary> {
        self.teachers
            .find_by_id(teacher_id)
            .await?
            .map(|t| TeacherSummary::from(&t))
            .ok_or_else(|| StudioError::not_found(TEACHER_NOT_FOUND))
    }

    async fn details(&self, session: Session) -> Result<SessionDetails> {
        let teacher = self.require_teacher(session.teacher_id).await.map_err(|_| {
            StudioError::Internal(format!(
                "Session {} references missing teacher {}",
                session.id, session.teacher_id
            ))
        })?;
        let users = self.sessions.participants(session.id).await?;
        debug!(session_id = session.id, participants = users.len(), "Loaded session");

        Ok(SessionDetails::new(session, teacher, users))
    }
}
