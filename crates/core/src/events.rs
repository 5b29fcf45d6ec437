use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Events emitted by the settlement pipeline for downstream consumers
/// (notification fan-out, real-time broadcast, achievement tracking).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SettlementEvent {
    /// A pending position reached a terminal outcome.
    PositionSettled {
        position_id: i64,
        creator_id: i64,
        creator_type: String,
        /// Expert the creator resolves to, when one exists.
        expert_id: Option<i64>,
        outcome: String,
        odds: Decimal,
        market: String,
        selection: String,
        settled_at: DateTime<Utc>,
    },

    /// An expert's statistics snapshot was recomputed wholesale.
    ExpertStatisticsRecalculated {
        expert_id: i64,
        previous_streak: Option<i32>,
        current_streak: i32,
        previous_rank: Option<i32>,
        current_rank: Option<i32>,
        recalculated_at: DateTime<Utc>,
    },
}
