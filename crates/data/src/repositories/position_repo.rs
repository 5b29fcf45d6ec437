//! Position repository.
//!
//! Provides operations for storing, querying, and settling positions.
//! Settlement writes are guarded on `status = 'pending'` so a position
//! can never be transitioned twice.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{PositionOutcome, PositionRecord};

/// One settlement transition to apply to a pending position.
#[derive(Debug, Clone)]
pub struct PositionSettlement {
    pub position_id: i64,
    pub outcome: PositionOutcome,
    pub settled_at: DateTime<Utc>,
}

/// Repository for position operations.
#[derive(Debug, Clone)]
pub struct PositionRepository {
    pool: PgPool,
}

impl PositionRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new position and returns the generated ID.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, record: &PositionRecord) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO positions
                (creator_id, creator_type, event_id, market, selection, odds,
                 status, outcome, created_at, settled_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(record.creator_id)
        .bind(&record.creator_type)
        .bind(&record.event_id)
        .bind(&record.market)
        .bind(&record.selection)
        .bind(record.odds)
        .bind(&record.status)
        .bind(&record.outcome)
        .bind(record.created_at)
        .bind(record.settled_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// Gets a position by ID.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<PositionRecord>> {
        let record = sqlx::query_as::<_, PositionRecord>(
            r#"
            SELECT id, creator_id, creator_type, event_id, market, selection, odds,
                   status, outcome, created_at, settled_at
            FROM positions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Queries the pending positions tied to one event.
    ///
    /// Pending-only selection is the settlement idempotency boundary: a
    /// position settled by a previous run is never returned again.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn pending_for_event(&self, event_id: &str) -> Result<Vec<PositionRecord>> {
        let records = sqlx::query_as::<_, PositionRecord>(
            r#"
            SELECT id, creator_id, creator_type, event_id, market, selection, odds,
                   status, outcome, created_at, settled_at
            FROM positions
            WHERE event_id = $1 AND status = 'pending'
            ORDER BY created_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Queries all positions opened by one creator.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn by_creator(
        &self,
        creator_id: i64,
        creator_type: &str,
    ) -> Result<Vec<PositionRecord>> {
        let records = sqlx::query_as::<_, PositionRecord>(
            r#"
            SELECT id, creator_id, creator_type, event_id, market, selection, odds,
                   status, outcome, created_at, settled_at
            FROM positions
            WHERE creator_id = $1 AND creator_type = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(creator_id)
        .bind(creator_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Queries the full position history attributed to an expert, oldest
    /// first.
    ///
    /// Covers positions opened by the expert account directly and those
    /// opened by the expert's owning user (query-time join, no stored
    /// link on the position).
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn history_for_expert(&self, expert_id: i64) -> Result<Vec<PositionRecord>> {
        let records = sqlx::query_as::<_, PositionRecord>(
            r#"
            SELECT p.id, p.creator_id, p.creator_type, p.event_id, p.market, p.selection,
                   p.odds, p.status, p.outcome, p.created_at, p.settled_at
            FROM positions p
            WHERE (p.creator_type = 'expert' AND p.creator_id = $1)
               OR (p.creator_type = 'user' AND p.creator_id IN
                     (SELECT e.user_id FROM experts e
                      WHERE e.id = $1 AND e.user_id IS NOT NULL))
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(expert_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Applies a batch of settlement transitions in one transaction.
    ///
    /// Every update is guarded on `status = 'pending'`; a position that
    /// was already terminal is left untouched. Returns the number of
    /// positions actually transitioned.
    ///
    /// # Errors
    /// Returns an error if the transaction fails; no partial batch is
    /// ever committed.
    pub async fn settle_batch(&self, settlements: &[PositionSettlement]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut updated = 0u64;

        for settlement in settlements {
            let result = sqlx::query(
                r#"
                UPDATE positions
                SET status = $2, outcome = $2, settled_at = $3
                WHERE id = $1 AND status = 'pending'
                "#,
            )
            .bind(settlement.position_id)
            .bind(settlement.outcome.as_str())
            .bind(settlement.settled_at)
            .execute(&mut *tx)
            .await?;

            updated += result.rows_affected();
        }

        tx.commit().await?;

        tracing::debug!(
            requested = settlements.len(),
            updated,
            "Settlement batch committed"
        );
        Ok(updated)
    }
}
