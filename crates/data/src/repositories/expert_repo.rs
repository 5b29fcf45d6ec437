//! Expert repository.

use anyhow::Result;
use sqlx::PgPool;

use crate::models::ExpertRecord;

/// Repository for expert lookups.
#[derive(Debug, Clone)]
pub struct ExpertRepository {
    pool: PgPool,
}

impl ExpertRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets an expert by ID.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<ExpertRecord>> {
        let record = sqlx::query_as::<_, ExpertRecord>(
            r#"
            SELECT id, user_id, display_name
            FROM experts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Finds the expert profile owned by a user, if one exists.
    ///
    /// This is the query-time join used to attribute a user-created
    /// position to an expert.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn find_by_user_id(&self, user_id: i64) -> Result<Option<ExpertRecord>> {
        let record = sqlx::query_as::<_, ExpertRecord>(
            r#"
            SELECT id, user_id, display_name
            FROM experts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
