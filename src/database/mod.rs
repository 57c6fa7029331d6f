//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations, health_check};
pub use memory::MemoryDatabase;
pub use repositories::{
    UserRepository, TeacherRepository, SessionRepository, UserStore, TeacherStore, SessionStore,
};
pub use service::DatabaseService;
