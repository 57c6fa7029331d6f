//! In-memory storage
//!
//! Implements every store trait over plain collections, with the same
//! constraint behaviour as the PostgreSQL schema: unique emails, foreign keys
//! checked on write, a unique `(session, user)` roster pair, and cascading
//! deletes. Used as the injected store in tests and local demos.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::repositories::session::ALREADY_PARTICIPATING;
use crate::database::repositories::{SessionStore, TeacherStore, UserStore};
use crate::models::{
    CreateSessionRequest, CreateTeacherRequest, CreateUserRequest, Participation, Session,
    Teacher, UpdateSessionRequest, User,
};
use crate::utils::errors::{StudioError, Result};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    teachers: BTreeMap<i64, Teacher>,
    sessions: BTreeMap<i64, Session>,
    participations: Vec<Participation>,
    next_user_id: i64,
    next_teacher_id: i64,
    next_session_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Shared in-memory database; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryDatabase {
    async fn create(&self, request: CreateUserRequest) -> Result<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == request.email) {
            return Err(StudioError::conflict("Email already exists"));
        }

        let now = Utc::now();
        let user = User {
            id: Tables::next_id(&mut tables.next_user_id),
            email: request.email,
            password_hash: request.password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            admin: request.admin,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn set_admin(&self, id: i64, admin: bool) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.admin = admin;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.users.remove(&id).is_some();
        if removed {
            tables.participations.retain(|p| p.user_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl TeacherStore for MemoryDatabase {
    async fn create(&self, request: CreateTeacherRequest) -> Result<Teacher> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let teacher = Teacher {
            id: Tables::next_id(&mut tables.next_teacher_id),
            first_name: request.first_name,
            last_name: request.last_name,
            created_at: now,
            updated_at: now,
        };
        tables.teachers.insert(teacher.id, teacher.clone());

        Ok(teacher)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        Ok(self.tables.read().await.teachers.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Teacher>> {
        let tables = self.tables.read().await;
        let mut teachers: Vec<Teacher> = tables.teachers.values().cloned().collect();
        teachers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(teachers)
    }
}

#[async_trait]
impl SessionStore for MemoryDatabase {
    async fn create(&self, request: CreateSessionRequest) -> Result<Session> {
        let mut tables = self.tables.write().await;

        if !tables.teachers.contains_key(&request.teacher_id) {
            return Err(StudioError::not_found("Teacher not found"));
        }

        let now = Utc::now();
        let session = Session {
            id: Tables::next_id(&mut tables.next_session_id),
            name: request.name,
            date: request.date,
            description: request.description,
            teacher_id: request.teacher_id,
            created_at: now,
            updated_at: now,
        };
        tables.sessions.insert(session.id, session.clone());

        Ok(session)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Session>> {
        Ok(self.tables.read().await.sessions.values().cloned().collect())
    }

    async fn update(&self, id: i64, request: UpdateSessionRequest) -> Result<Option<Session>> {
        let mut tables = self.tables.write().await;

        if let Some(teacher_id) = request.teacher_id {
            if !tables.teachers.contains_key(&teacher_id) {
                return Err(StudioError::not_found("Teacher not found"));
            }
        }

        Ok(tables.sessions.get_mut(&id).map(|session| {
            if let Some(name) = request.name {
                session.name = name;
            }
            if let Some(date) = request.date {
                session.date = date;
            }
            if let Some(description) = request.description {
                session.description = description;
            }
            if let Some(teacher_id) = request.teacher_id {
                session.teacher_id = teacher_id;
            }
            session.updated_at = Utc::now();
            session.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.sessions.remove(&id).is_some();
        if removed {
            tables.participations.retain(|p| p.session_id != id);
        }
        Ok(removed)
    }

    async fn participants(&self, session_id: i64) -> Result<Vec<i64>> {
        let tables = self.tables.read().await;
        Ok(tables
            .participations
            .iter()
            .filter(|p| p.session_id == session_id)
            .map(|p| p.user_id)
            .collect())
    }

    async fn all_participants(&self) -> Result<HashMap<i64, Vec<i64>>> {
        let tables = self.tables.read().await;
        let mut roster: HashMap<i64, Vec<i64>> = HashMap::new();
        for participation in &tables.participations {
            roster.entry(participation.session_id).or_default().push(participation.user_id);
        }
        Ok(roster)
    }

    async fn is_participating(&self, session_id: i64, user_id: i64) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .participations
            .iter()
            .any(|p| p.session_id == session_id && p.user_id == user_id))
    }

    async fn add_participant(&self, session_id: i64, user_id: i64) -> Result<Participation> {
        let mut tables = self.tables.write().await;

        if !tables.sessions.contains_key(&session_id) {
            return Err(StudioError::not_found("Session not found"));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(StudioError::not_found("User not found"));
        }
        if tables
            .participations
            .iter()
            .any(|p| p.session_id == session_id && p.user_id == user_id)
        {
            return Err(StudioError::conflict(ALREADY_PARTICIPATING));
        }

        let participation = Participation {
            session_id,
            user_id,
            created_at: Utc::now(),
        };
        tables.participations.push(participation.clone());

        Ok(participation)
    }

    async fn remove_participant(&self, session_id: i64, user_id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.participations.len();
        tables
            .participations
            .retain(|p| !(p.session_id == session_id && p.user_id == user_id));
        Ok(tables.participations.len() < before)
    }
}
