//! Teacher directory
//!
//! Read-only; teachers are provisioned by the seed binary.

use std::sync::Arc;

use crate::database::TeacherStore;
use crate::models::Teacher;
use crate::utils::errors::{StudioError, Result};

#[derive(Clone)]
pub struct TeacherDirectory {
    teachers: Arc<dyn TeacherStore>,
}

impl TeacherDirectory {
    pub fn new(teachers: Arc<dyn TeacherStore>) -> Self {
        Self { teachers }
    }

    /// Newest created first
    pub async fn list(&self) -> Result<Vec<Teacher>> {
        self.teachers.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Teacher> {
        self.teachers
            .find_by_id(id)
            .await?
            .ok_or_else(|| StudioError::not_found("Teacher not found"))
    }
}
