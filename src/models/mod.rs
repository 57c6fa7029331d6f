//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod teacher;
pub mod session;

// Re-export commonly used models
pub use user::{User, CreateUserRequest, RegisterRequest, LoginRequest, AuthResponse, ValidRegistration};
pub use teacher::{Teacher, TeacherSummary, CreateTeacherRequest};
pub use session::{
    Session, Participation, SessionDetails, CreateSessionPayload, UpdateSessionPayload,
    CreateSessionRequest, UpdateSessionRequest,
};
