//! Event outcome repository.
//!
//! Outcomes are written once by the external ingestion job and read by
//! the settlement batch.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::EventOutcomeRecord;

/// Repository for sport event outcome operations.
#[derive(Debug, Clone)]
pub struct EventOutcomeRepository {
    pool: PgPool,
}

impl EventOutcomeRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new event outcome and returns the generated ID.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, record: &EventOutcomeRecord) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO event_outcomes
                (event_id, status, final_score, winner, market_result, settled_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&record.event_id)
        .bind(&record.status)
        .bind(&record.final_score)
        .bind(&record.winner)
        .bind(&record.market_result)
        .bind(record.settled_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// Gets the outcome recorded for an event, if any.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get_by_event_id(&self, event_id: &str) -> Result<Option<EventOutcomeRecord>> {
        let record = sqlx::query_as::<_, EventOutcomeRecord>(
            r#"
            SELECT id, event_id, status, final_score, winner, market_result, settled_at
            FROM event_outcomes
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Queries outcomes that became final within the lookback window.
    ///
    /// Only completed and cancelled events can settle positions; live and
    /// scheduled events are never returned.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn recently_settled(&self, since: DateTime<Utc>) -> Result<Vec<EventOutcomeRecord>> {
        let records = sqlx::query_as::<_, EventOutcomeRecord>(
            r#"
            SELECT id, event_id, status, final_score, winner, market_result, settled_at
            FROM event_outcomes
            WHERE status IN ('completed', 'cancelled') AND settled_at >= $1
            ORDER BY settled_at ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
