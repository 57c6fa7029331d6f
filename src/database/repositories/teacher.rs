//! Teacher repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use crate::models::teacher::{Teacher, CreateTeacherRequest};
use crate::utils::errors::Result;
use super::TeacherStore;

#[derive(Clone, Debug)]
pub struct TeacherRepository {
    pool: PgPool,
}

impl TeacherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a teacher by full name (seed provisioning)
    pub async fn find_by_name(&self, first_name: &str, last_name: &str) -> Result<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, Teacher>(
            "SELECT id, first_name, last_name, created_at, updated_at FROM teachers WHERE first_name = $1 AND last_name = $2 ORDER BY id ASC LIMIT 1"
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(teacher)
    }
}

#[async_trait]
impl TeacherStore for TeacherRepository {
    async fn create(&self, request: CreateTeacherRequest) -> Result<Teacher> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (first_name, last_name, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, first_name, last_name, created_at, updated_at
            "#
        )
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(teacher)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, Teacher>(
            "SELECT id, first_name, last_name, created_at, updated_at FROM teachers WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(teacher)
    }

    async fn list(&self) -> Result<Vec<Teacher>> {
        let teachers = sqlx::query_as::<_, Teacher>(
            "SELECT id, first_name, last_name, created_at, updated_at FROM teachers ORDER BY created_at DESC, id DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teachers)
    }
}
