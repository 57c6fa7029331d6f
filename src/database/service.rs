//! Database service layer
//!
//! Bundles the storage handles that get injected into the services.

use std::sync::Arc;

use crate::database::memory::MemoryDatabase;
use crate::database::{
    DatabasePool, SessionRepository, SessionStore, TeacherRepository, TeacherStore,
    UserRepository, UserStore,
};
use crate::utils::errors::StudioError;

#[derive(Clone)]
pub struct DatabaseService {
    pub users: Arc<dyn UserStore>,
    pub teachers: Arc<dyn TeacherStore>,
    pub sessions: Arc<dyn SessionStore>,
    pool: Option<DatabasePool>,
}

impl DatabaseService {
    /// PostgreSQL-backed storage
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            teachers: Arc::new(TeacherRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Storage backed by a shared [`MemoryDatabase`]
    pub fn in_memory(db: MemoryDatabase) -> Self {
        Self {
            users: Arc::new(db.clone()),
            teachers: Arc::new(db.clone()),
            sessions: Arc::new(db),
            pool: None,
        }
    }

    /// Ping the underlying store
    pub async fn health_check(&self) -> Result<(), StudioError> {
        match &self.pool {
            Some(pool) => super::connection::health_check(pool).await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService")
            .field("postgres", &self.pool.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_service_is_healthy() {
        let service = DatabaseService::in_memory(MemoryDatabase::new());
        assert!(service.health_check().await.is_ok());
        assert!(service.teachers.list().await.unwrap().is_empty());
    }
}
