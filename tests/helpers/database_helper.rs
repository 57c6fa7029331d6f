//! Test database helper utilities
//!
//! PostgreSQL tests run against `TEST_DATABASE_URL` and are skipped when it
//! is unset.

use sqlx::PgPool;

use YogaStudio::database::DatabaseService;

use super::init_test_logging;

/// Test database helper that manages PostgreSQL test database setup
pub struct TestDatabase {
    pub pool: PgPool,
}

impl TestDatabase {
    /// Connect, migrate and empty every table. `None` when no test database
    /// is configured.
    pub async fn connect() -> Option<Self> {
        init_test_logging();

        let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        };

        let pool = PgPool::connect(&database_url).await.expect("Failed to connect to test database");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let db = Self { pool };
        db.cleanup().await;
        Some(db)
    }

    pub fn service(&self) -> DatabaseService {
        DatabaseService::new(self.pool.clone())
    }

    /// Remove all rows and reset identities
    pub async fn cleanup(&self) {
        sqlx::query("TRUNCATE participations, sessions, teachers, users RESTART IDENTITY CASCADE")
            .execute(&self.pool)
            .await
            .expect("Failed to truncate tables");
    }

    pub async fn count_records(&self, table: &str) -> i64 {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count records");
        count.0
    }
}
