//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod authorization;
pub mod password;
pub mod session;
pub mod teacher;
pub mod token;
pub mod user;

// Re-export commonly used services
pub use auth::CredentialService;
pub use authorization::AuthorizationGate;
pub use session::SessionRegistry;
pub use teacher::TeacherDirectory;
pub use token::{Claims, TokenService};
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub credential_service: CredentialService,
    pub authorization: AuthorizationGate,
    pub session_registry: SessionRegistry,
    pub teacher_directory: TeacherDirectory,
    pub user_service: UserService,
    database: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(database: DatabaseService, settings: &Settings) -> Result<Self> {
        let tokens = TokenService::from_config(&settings.auth)?;
        let authorization = AuthorizationGate::new(
            database.users.clone(),
            tokens.clone(),
            settings.app.environment,
        );

        let credential_service =
            CredentialService::new(database.users.clone(), tokens, settings.auth.bcrypt_cost);
        let session_registry = SessionRegistry::new(
            database.sessions.clone(),
            database.teachers.clone(),
            database.users.clone(),
            authorization.clone(),
        );
        let teacher_directory = TeacherDirectory::new(database.teachers.clone());
        let user_service = UserService::new(database.users.clone(), authorization.clone());

        Ok(Self {
            credential_service,
            authorization,
            session_registry,
            teacher_directory,
            user_service,
            database,
        })
    }

    /// Health check for the backing store
    pub async fn health_check(&self) -> Result<()> {
        self.database.health_check().await
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("database", &self.database)
            .field("authorization", &self.authorization)
            .finish_non_exhaustive()
    }
}
