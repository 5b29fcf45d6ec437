//! Wholesale recomputation of expert statistics.
//!
//! The engine is pure: it receives the expert's full position history and
//! the reference time, and produces a complete snapshot. Nothing is
//! patched incrementally, so repeated runs can never drift.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tipster_data::models::{ExpertStatisticsRecord, PositionOutcome, PositionRecord, Tier};

/// Statistics calculator for one expert's position history.
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Computes a full statistics snapshot.
    ///
    /// `now` anchors the rolling windows; passing it in keeps the engine
    /// deterministic.
    #[must_use]
    pub fn compute(
        expert_id: i64,
        history: &[PositionRecord],
        now: DateTime<Utc>,
    ) -> ExpertStatisticsRecord {
        let mut won = 0i64;
        let mut lost = 0i64;
        let mut void = 0i64;
        let mut pending = 0i64;

        for position in history {
            match position.parsed_outcome() {
                Some(PositionOutcome::Won) => won += 1,
                Some(PositionOutcome::Lost) => lost += 1,
                Some(PositionOutcome::Void) => void += 1,
                None => pending += 1,
            }
        }

        let total = history.len() as i64;
        let win_rate = Self::win_rate(won, lost);
        let average_odds = Self::average_odds(history);
        let (current_streak, longest_win_streak) = Self::streaks(history);

        let last7_days_win_rate = Self::rolling_win_rate(history, now, 7);
        let last30_days_win_rate = Self::rolling_win_rate(history, now, 30);
        let last90_days_win_rate = Self::rolling_win_rate(history, now, 90);

        let total_profit: Decimal = history
            .iter()
            .filter_map(|p| match p.parsed_outcome() {
                Some(PositionOutcome::Won) => Some(p.odds - Decimal::ONE),
                Some(PositionOutcome::Lost) => Some(-Decimal::ONE),
                _ => None,
            })
            .sum();
        let roi = if won + lost > 0 {
            (total_profit / Decimal::from(won + lost) * dec!(100)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        let tier = Tier::classify(last90_days_win_rate, total);

        tracing::debug!(
            expert_id,
            total_positions = total,
            win_rate = %win_rate,
            current_streak,
            tier = tier.as_str(),
            "Recomputed expert statistics"
        );

        ExpertStatisticsRecord {
            expert_id,
            total_positions: total,
            won_positions: won,
            lost_positions: lost,
            void_positions: void,
            pending_positions: pending,
            win_rate,
            average_odds,
            total_profit,
            roi,
            current_streak,
            longest_win_streak,
            last7_days_win_rate,
            last30_days_win_rate,
            last90_days_win_rate,
            tier: tier.as_str().to_string(),
            updated_at: now,
        }
    }

    /// Won / (Won + Lost) x 100, two decimal places. Void and pending
    /// positions never enter the denominator.
    fn win_rate(won: i64, lost: i64) -> Decimal {
        let settled = won + lost;
        if settled == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(won) / Decimal::from(settled) * dec!(100)).round_dp(2)
    }

    fn average_odds(history: &[PositionRecord]) -> Decimal {
        let odds: Vec<Decimal> = history
            .iter()
            .filter(|p| p.is_settled())
            .map(|p| p.odds)
            .collect();

        if odds.is_empty() {
            return Decimal::ZERO;
        }
        let sum: Decimal = odds.iter().sum();
        (sum / Decimal::from(odds.len())).round_dp(2)
    }

    /// Walks won/lost positions in creation order; voids are skipped
    /// entirely and neither extend nor reset a run.
    fn streaks(history: &[PositionRecord]) -> (i32, i32) {
        let mut decisive: Vec<&PositionRecord> = history
            .iter()
            .filter(|p| {
                matches!(
                    p.parsed_outcome(),
                    Some(PositionOutcome::Won | PositionOutcome::Lost)
                )
            })
            .collect();
        decisive.sort_by_key(|p| p.created_at);

        let mut current = 0i32;
        let mut longest = 0i32;

        for position in decisive {
            if position.parsed_outcome() == Some(PositionOutcome::Won) {
                current = if current >= 0 { current + 1 } else { 1 };
                longest = longest.max(current);
            } else {
                current = if current <= 0 { current - 1 } else { -1 };
            }
        }

        (current, longest)
    }

    fn rolling_win_rate(history: &[PositionRecord], now: DateTime<Utc>, days: i64) -> Decimal {
        let cutoff = now - Duration::days(days);
        let mut won = 0i64;
        let mut lost = 0i64;

        for position in history.iter().filter(|p| p.created_at >= cutoff) {
            match position.parsed_outcome() {
                Some(PositionOutcome::Won) => won += 1,
                Some(PositionOutcome::Lost) => lost += 1,
                _ => {}
            }
        }

        Self::win_rate(won, lost)
    }
}
