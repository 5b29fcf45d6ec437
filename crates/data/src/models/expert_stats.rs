//! Expert statistics snapshot and tier classification.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Ordinal performance tier, derived solely from 90-day win rate and
/// position volume. Never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Tier {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
            Self::Diamond => "diamond",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bronze" => Some(Self::Bronze),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            "diamond" => Some(Self::Diamond),
            _ => None,
        }
    }

    /// Classifies an expert from their last-90-day win rate and total
    /// position count.
    ///
    /// Experts with fewer than 20 positions are Bronze unconditionally;
    /// above that the win rate buckets at inclusive lower bounds
    /// 80/70/60/50.
    #[must_use]
    pub fn classify(last90_days_win_rate: Decimal, total_positions: i64) -> Self {
        if total_positions < 20 {
            return Self::Bronze;
        }
        if last90_days_win_rate >= dec!(80) {
            Self::Diamond
        } else if last90_days_win_rate >= dec!(70) {
            Self::Platinum
        } else if last90_days_win_rate >= dec!(60) {
            Self::Gold
        } else if last90_days_win_rate >= dec!(50) {
            Self::Silver
        } else {
            Self::Bronze
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full statistics snapshot for one expert.
///
/// Recomputed wholesale from the expert's complete position history on
/// every recalculation; never patched incrementally.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExpertStatisticsRecord {
    pub expert_id: i64,
    pub total_positions: i64,
    pub won_positions: i64,
    pub lost_positions: i64,
    pub void_positions: i64,
    pub pending_positions: i64,
    /// Won / (Won + Lost) x 100, 2 decimal places; 0 when nothing settled.
    pub win_rate: Decimal,
    /// Mean odds over non-pending positions; 0 when none.
    pub average_odds: Decimal,
    /// Sum of unit-stake returns over settled won/lost positions.
    pub total_profit: Decimal,
    /// `total_profit` / settled count x 100, 2 decimal places.
    pub roi: Decimal,
    /// Signed run length: positive = consecutive wins, negative =
    /// consecutive losses. Voids neither extend nor reset it.
    pub current_streak: i32,
    pub longest_win_streak: i32,
    pub last7_days_win_rate: Decimal,
    pub last30_days_win_rate: Decimal,
    pub last90_days_win_rate: Decimal,
    /// Tier name: "bronze" .. "diamond".
    pub tier: String,
    pub updated_at: DateTime<Utc>,
}

impl ExpertStatisticsRecord {
    /// Creates an all-zero snapshot for an expert with no history.
    #[must_use]
    pub fn empty(expert_id: i64, updated_at: DateTime<Utc>) -> Self {
        Self {
            expert_id,
            total_positions: 0,
            won_positions: 0,
            lost_positions: 0,
            void_positions: 0,
            pending_positions: 0,
            win_rate: Decimal::ZERO,
            average_odds: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            roi: Decimal::ZERO,
            current_streak: 0,
            longest_win_streak: 0,
            last7_days_win_rate: Decimal::ZERO,
            last30_days_win_rate: Decimal::ZERO,
            last90_days_win_rate: Decimal::ZERO,
            tier: Tier::Bronze.as_str().to_string(),
            updated_at,
        }
    }

    /// Returns the parsed tier.
    #[must_use]
    pub fn parsed_tier(&self) -> Option<Tier> {
        Tier::parse(&self.tier)
    }
}
