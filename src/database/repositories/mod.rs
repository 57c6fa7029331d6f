//! Database repositories module
//!
//! Storage handles are traits so services can be handed either the
//! PostgreSQL repositories or the in-memory store used in tests.

pub mod user;
pub mod teacher;
pub mod session;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::{
    CreateSessionRequest, CreateTeacherRequest, CreateUserRequest, Participation, Session,
    Teacher, UpdateSessionRequest, User,
};
use crate::utils::errors::{sqlstate, sqlstate_of, StudioError, Result};

// Re-export repositories
pub use user::UserRepository;
pub use teacher::TeacherRepository;
pub use session::SessionRepository;

/// Credential records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already taken
    async fn create(&self, request: CreateUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Returns `None` when the user does not exist
    async fn set_admin(&self, id: i64, admin: bool) -> Result<Option<User>>;
    /// Returns whether a row was removed; participations cascade
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Teacher directory
#[async_trait]
pub trait TeacherStore: Send + Sync {
    async fn create(&self, request: CreateTeacherRequest) -> Result<Teacher>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    /// Newest created first
    async fn list(&self) -> Result<Vec<Teacher>>;
}

/// Session catalog and participation roster
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fails with `NotFound` when the teacher does not exist
    async fn create(&self, request: CreateSessionRequest) -> Result<Session>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Session>>;
    /// Ordered by id
    async fn list(&self) -> Result<Vec<Session>>;
    /// Returns `None` when the session does not exist
    async fn update(&self, id: i64, request: UpdateSessionRequest) -> Result<Option<Session>>;
    /// Returns whether a row was removed; participations cascade
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Participant ids of one session, in join order
    async fn participants(&self, session_id: i64) -> Result<Vec<i64>>;
    /// Participant ids of every session, in join order
    async fn all_participants(&self) -> Result<HashMap<i64, Vec<i64>>>;
    async fn is_participating(&self, session_id: i64, user_id: i64) -> Result<bool>;
    /// Fails with `Conflict` on a duplicate pair and `NotFound` when the
    /// session or user is gone
    async fn add_participant(&self, session_id: i64, user_id: i64) -> Result<Participation>;
    /// Returns whether the pair existed
    async fn remove_participant(&self, session_id: i64, user_id: i64) -> Result<bool>;
}

/// Translate constraint violations into domain outcomes.
///
/// Unique violations become `Conflict(on_unique)` and foreign key
/// violations become `NotFound(on_foreign_key)`; anything else stays a
/// database error.
pub(crate) fn map_constraint_violation(err: sqlx::Error, on_unique: &str, on_foreign_key: &str) -> StudioError {
    match sqlstate_of(&err).as_deref() {
        Some(sqlstate::UNIQUE_VIOLATION) => StudioError::conflict(on_unique),
        Some(sqlstate::FOREIGN_KEY_VIOLATION) => StudioError::not_found(on_foreign_key),
        _ => StudioError::Database(err),
    }
}
