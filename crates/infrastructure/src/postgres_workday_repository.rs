//! PostgreSQL-backed work-day repository.

use async_trait::async_trait;
use sqlx::PgPool;

use gigbook_application::WorkdayRepository;
use gigbook_core::{AppError, AppResult};
use gigbook_domain::{UserId, WorkdayEntry};

/// PostgreSQL implementation of the work-day repository port.
#[derive(Clone)]
pub struct PostgresWorkdayRepository {
    pool: PgPool,
}

impl PostgresWorkdayRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkdayRepository for PostgresWorkdayRepository {
    async fn mark_working_day(&self, user_id: UserId, entry: &WorkdayEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO workdays (user_id, date, day_off)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, date) DO UPDATE SET day_off = EXCLUDED.day_off
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(entry.date)
        .bind(entry.day_off)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to mark working day: {error}")))?;

        Ok(())
    }
}
