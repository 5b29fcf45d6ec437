//! Expert statistics repository.
//!
//! Snapshots are replaced wholesale on every recalculation; there is no
//! incremental update path.

use anyhow::Result;
use sqlx::PgPool;

use crate::models::ExpertStatisticsRecord;

/// Repository for expert statistics snapshots.
#[derive(Debug, Clone)]
pub struct ExpertStatisticsRepository {
    pool: PgPool,
}

impl ExpertStatisticsRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets the current snapshot for an expert, if one exists.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get(&self, expert_id: i64) -> Result<Option<ExpertStatisticsRecord>> {
        let record = sqlx::query_as::<_, ExpertStatisticsRecord>(
            r#"
            SELECT expert_id, total_positions, won_positions, lost_positions,
                   void_positions, pending_positions, win_rate, average_odds,
                   total_profit, roi, current_streak, longest_win_streak,
                   last7_days_win_rate, last30_days_win_rate, last90_days_win_rate,
                   tier, updated_at
            FROM expert_statistics
            WHERE expert_id = $1
            "#,
        )
        .bind(expert_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Replaces the expert's snapshot with a freshly computed one.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn upsert(&self, record: &ExpertStatisticsRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expert_statistics
                (expert_id, total_positions, won_positions, lost_positions,
                 void_positions, pending_positions, win_rate, average_odds,
                 total_profit, roi, current_streak, longest_win_streak,
                 last7_days_win_rate, last30_days_win_rate, last90_days_win_rate,
                 tier, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (expert_id) DO UPDATE SET
                total_positions = EXCLUDED.total_positions,
                won_positions = EXCLUDED.won_positions,
                lost_positions = EXCLUDED.lost_positions,
                void_positions = EXCLUDED.void_positions,
                pending_positions = EXCLUDED.pending_positions,
                win_rate = EXCLUDED.win_rate,
                average_odds = EXCLUDED.average_odds,
                total_profit = EXCLUDED.total_profit,
                roi = EXCLUDED.roi,
                current_streak = EXCLUDED.current_streak,
                longest_win_streak = EXCLUDED.longest_win_streak,
                last7_days_win_rate = EXCLUDED.last7_days_win_rate,
                last30_days_win_rate = EXCLUDED.last30_days_win_rate,
                last90_days_win_rate = EXCLUDED.last90_days_win_rate,
                tier = EXCLUDED.tier,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.expert_id)
        .bind(record.total_positions)
        .bind(record.won_positions)
        .bind(record.lost_positions)
        .bind(record.void_positions)
        .bind(record.pending_positions)
        .bind(record.win_rate)
        .bind(record.average_odds)
        .bind(record.total_profit)
        .bind(record.roi)
        .bind(record.current_streak)
        .bind(record.longest_win_streak)
        .bind(record.last7_days_win_rate)
        .bind(record.last30_days_win_rate)
        .bind(record.last90_days_win_rate)
        .bind(&record.tier)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Queries the win-rate leaderboard, best first.
    ///
    /// Only experts with at least one settled won/lost position qualify;
    /// ties break on settled volume.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn top_by_win_rate(&self, limit: i64) -> Result<Vec<ExpertStatisticsRecord>> {
        let records = sqlx::query_as::<_, ExpertStatisticsRecord>(
            r#"
            SELECT expert_id, total_positions, won_positions, lost_positions,
                   void_positions, pending_positions, win_rate, average_odds,
                   total_profit, roi, current_streak, longest_win_streak,
                   last7_days_win_rate, last30_days_win_rate, last90_days_win_rate,
                   tier, updated_at
            FROM expert_statistics
            WHERE won_positions + lost_positions > 0
            ORDER BY win_rate DESC, won_positions + lost_positions DESC, expert_id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
