//! The settlement batch orchestrator.
//!
//! One run: discover outcomes that became final inside the lookback
//! window, classify the pending positions tied to them, persist every
//! transition in a single transaction, emit one event per settled
//! position, then recompute statistics once per distinct affected
//! expert. Only pending positions are ever candidates, so re-running a
//! batch is a no-op for anything settled before.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use tipster_core::events::SettlementEvent;
use tipster_data::models::{CreatorType, EventOutcomeRecord, ExpertStatisticsRecord, PositionOutcome, PositionRecord};
use tipster_data::repositories::{PositionSettlement, Repositories};
use tipster_settlement::{ResultParser, StrategyDispatcher};
use tipster_stats::StatisticsEngine;

use crate::bus::SettlementEventBus;

/// Why a position could not be classified in this run.
///
/// The strategies themselves are total, so failures here are
/// data-integrity guards; a failed position stays pending for retry.
#[derive(Debug, Clone, Error)]
pub enum ClassificationError {
    #[error("decimal odds must exceed 1.0, got {odds}")]
    InvalidOdds { odds: Decimal },
    #[error("stored status {status:?} is not a known lifecycle state")]
    CorruptStatus { status: String },
}

/// A position left pending because classification failed.
#[derive(Debug, Clone)]
pub struct PositionFailure {
    pub position_id: i64,
    pub reason: String,
}

/// Summary of one settlement batch run.
#[derive(Debug, Clone, Default)]
pub struct SettlementRunReport {
    pub outcomes_discovered: usize,
    pub candidates: usize,
    pub settled_won: usize,
    pub settled_lost: usize,
    pub settled_void: usize,
    pub failures: Vec<PositionFailure>,
    pub experts_recalculated: usize,
    pub experts_failed: usize,
    /// True when the run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl SettlementRunReport {
    /// Total positions transitioned this run.
    #[must_use]
    pub fn total_settled(&self) -> usize {
        self.settled_won + self.settled_lost + self.settled_void
    }
}

/// Classifies one pending position against its event outcome.
///
/// Pure: parsing and strategy dispatch only, no I/O. Never panics; any
/// missing or garbled result data resolves to Void inside the strategy.
///
/// # Errors
/// Returns a [`ClassificationError`] when the stored position itself is
/// malformed (the position is left pending rather than settled).
pub fn classify_position(
    parser: &ResultParser,
    dispatcher: &StrategyDispatcher,
    position: &PositionRecord,
    outcome: &EventOutcomeRecord,
) -> Result<PositionOutcome, ClassificationError> {
    if position.parsed_status().is_none() {
        return Err(ClassificationError::CorruptStatus {
            status: position.status.clone(),
        });
    }
    if position.odds <= Decimal::ONE {
        return Err(ClassificationError::InvalidOdds {
            odds: position.odds,
        });
    }

    let result = parser.parse(outcome);
    let strategy = dispatcher.resolve(&position.market);
    Ok(strategy.determine(&position.selection, result.as_ref()))
}

/// 1-based rank of an expert within a leaderboard ordering, if present.
#[must_use]
pub fn rank_of(leaderboard: &[ExpertStatisticsRecord], expert_id: i64) -> Option<i32> {
    leaderboard
        .iter()
        .position(|stats| stats.expert_id == expert_id)
        .and_then(|index| i32::try_from(index + 1).ok())
}

/// Batch settlement orchestrator.
///
/// All collaborators are passed in explicitly; the orchestrator owns the
/// I/O boundary and keeps the engines pure.
pub struct SettlementOrchestrator {
    repos: Repositories,
    parser: ResultParser,
    dispatcher: StrategyDispatcher,
    bus: SettlementEventBus,
    lookback: Duration,
    leaderboard_size: i64,
    cancel: Arc<AtomicBool>,
}

impl SettlementOrchestrator {
    /// Creates a new orchestrator.
    #[must_use]
    pub fn new(
        repos: Repositories,
        parser: ResultParser,
        dispatcher: StrategyDispatcher,
        bus: SettlementEventBus,
        lookback_hours: i64,
        leaderboard_size: i64,
    ) -> Self {
        Self {
            repos,
            parser,
            dispatcher,
            bus,
            lookback: Duration::hours(lookback_hours),
            leaderboard_size,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag for cooperative cancellation. Setting it stops the run after
    /// the position currently being classified.
    #[must_use]
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Executes one settlement batch.
    ///
    /// Per-position classification failures are recorded and skipped;
    /// infrastructure failures abort the run (the scheduler retries it —
    /// safe, because candidates are selected pending-only and the batch
    /// persist is transactional).
    ///
    /// # Errors
    /// Returns an error when discovery or the batch persist fails.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<SettlementRunReport> {
        let run_id = Uuid::new_v4();
        let since = now - self.lookback;
        let mut report = SettlementRunReport::default();

        let outcomes = self
            .repos
            .event_outcomes
            .recently_settled(since)
            .await
            .context("Failed to discover settled event outcomes")?;
        report.outcomes_discovered = outcomes.len();

        info!(%run_id, outcomes = outcomes.len(), %since, "Starting settlement run");

        let mut classified: Vec<(PositionRecord, PositionOutcome)> = Vec::new();

        'outcomes: for outcome in &outcomes {
            let positions = self
                .repos
                .positions
                .pending_for_event(&outcome.event_id)
                .await
                .with_context(|| {
                    format!("Failed to load pending positions for event {}", outcome.event_id)
                })?;
            report.candidates += positions.len();

            for position in positions {
                if self.cancel.load(Ordering::Relaxed) {
                    report.cancelled = true;
                    warn!(%run_id, "Cancellation requested, stopping before next position");
                    break 'outcomes;
                }

                match classify_position(&self.parser, &self.dispatcher, &position, outcome) {
                    Ok(decided) => classified.push((position, decided)),
                    Err(e) => {
                        warn!(
                            position_id = position.id,
                            error = %e,
                            "Position not classifiable, leaving pending"
                        );
                        report.failures.push(PositionFailure {
                            position_id: position.id,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        if classified.is_empty() {
            info!(%run_id, "No positions to settle");
            return Ok(report);
        }

        // Single transaction; the pending-status guard inside makes a
        // replay of this batch a no-op.
        let batch: Vec<PositionSettlement> = classified
            .iter()
            .map(|(position, decided)| PositionSettlement {
                position_id: position.id,
                outcome: *decided,
                settled_at: now,
            })
            .collect();
        let updated = self
            .repos
            .positions
            .settle_batch(&batch)
            .await
            .context("Failed to persist settlement batch")?;
        if (updated as usize) < batch.len() {
            warn!(
                %run_id,
                expected = batch.len(),
                updated,
                "Some positions were no longer pending at persist time"
            );
        }

        let mut expert_cache: HashMap<(String, i64), Option<i64>> = HashMap::new();
        let mut affected: BTreeSet<i64> = BTreeSet::new();

        for (position, decided) in &classified {
            match decided {
                PositionOutcome::Won => report.settled_won += 1,
                PositionOutcome::Lost => report.settled_lost += 1,
                PositionOutcome::Void => report.settled_void += 1,
            }

            let expert_id = self.resolve_expert(&mut expert_cache, position).await;
            if let Some(id) = expert_id {
                affected.insert(id);
            }

            self.bus.publish(SettlementEvent::PositionSettled {
                position_id: position.id,
                creator_id: position.creator_id,
                creator_type: position.creator_type.clone(),
                expert_id,
                outcome: decided.to_string(),
                odds: position.odds,
                market: position.market.clone(),
                selection: position.selection.clone(),
                settled_at: now,
            });

            info!(
                position_id = position.id,
                market = %position.market,
                selection = %position.selection,
                outcome = %decided,
                "Position settled"
            );
        }

        for expert_id in affected {
            match self.recalculate_expert(expert_id, now).await {
                Ok(true) => report.experts_recalculated += 1,
                Ok(false) => report.experts_failed += 1,
                Err(e) => {
                    error!(expert_id, error = %e, "Statistics recalculation failed");
                    report.experts_failed += 1;
                }
            }
        }

        info!(
            %run_id,
            settled = report.total_settled(),
            won = report.settled_won,
            lost = report.settled_lost,
            void = report.settled_void,
            failures = report.failures.len(),
            experts = report.experts_recalculated,
            cancelled = report.cancelled,
            "Settlement run complete"
        );

        Ok(report)
    }

    /// Recomputes one expert's statistics wholesale and emits the
    /// recalculation event with streak and leaderboard-rank transitions.
    ///
    /// Returns `Ok(false)` when the expert no longer exists (skipped,
    /// other experts unaffected).
    ///
    /// # Errors
    /// Returns an error if any repository call fails.
    pub async fn recalculate_expert(&self, expert_id: i64, now: DateTime<Utc>) -> Result<bool> {
        if self.repos.experts.get_by_id(expert_id).await?.is_none() {
            warn!(expert_id, "Expert not found, skipping recalculation");
            return Ok(false);
        }

        let previous = self.repos.expert_stats.get(expert_id).await?;
        let leaderboard_before = self
            .repos
            .expert_stats
            .top_by_win_rate(self.leaderboard_size)
            .await?;
        let previous_rank = rank_of(&leaderboard_before, expert_id);

        let history = self.repos.positions.history_for_expert(expert_id).await?;
        let snapshot = StatisticsEngine::compute(expert_id, &history, now);
        self.repos.expert_stats.upsert(&snapshot).await?;

        let leaderboard_after = self
            .repos
            .expert_stats
            .top_by_win_rate(self.leaderboard_size)
            .await?;
        let current_rank = rank_of(&leaderboard_after, expert_id);

        self.bus
            .publish(SettlementEvent::ExpertStatisticsRecalculated {
                expert_id,
                previous_streak: previous.as_ref().map(|stats| stats.current_streak),
                current_streak: snapshot.current_streak,
                previous_rank,
                current_rank,
                recalculated_at: now,
            });

        info!(
            expert_id,
            win_rate = %snapshot.win_rate,
            current_streak = snapshot.current_streak,
            tier = %snapshot.tier,
            "Expert statistics recalculated"
        );

        Ok(true)
    }

    async fn resolve_expert(
        &self,
        cache: &mut HashMap<(String, i64), Option<i64>>,
        position: &PositionRecord,
    ) -> Option<i64> {
        let key = (position.creator_type.clone(), position.creator_id);
        if let Some(cached) = cache.get(&key) {
            return *cached;
        }

        let resolved = match position.parsed_creator_type() {
            Some(CreatorType::Expert) => {
                match self.repos.experts.get_by_id(position.creator_id).await {
                    Ok(expert) => expert.map(|e| e.id),
                    Err(e) => {
                        warn!(creator_id = position.creator_id, error = %e, "Expert lookup failed");
                        None
                    }
                }
            }
            Some(CreatorType::User) => {
                match self.repos.experts.find_by_user_id(position.creator_id).await {
                    Ok(expert) => expert.map(|e| e.id),
                    Err(e) => {
                        warn!(creator_id = position.creator_id, error = %e, "Expert lookup failed");
                        None
                    }
                }
            }
            None => {
                warn!(
                    position_id = position.id,
                    creator_type = %position.creator_type,
                    "Unknown creator type"
                );
                None
            }
        };

        cache.insert(key, resolved);
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    // =========================================================================
    // Test Helpers
    // =========================================================================

    fn sample_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 17, 0, 0).unwrap()
    }

    fn sample_position(market: &str, selection: &str, odds: Decimal) -> PositionRecord {
        PositionRecord::new(
            7,
            CreatorType::Expert,
            "event-100".to_string(),
            market.to_string(),
            selection.to_string(),
            odds,
            sample_timestamp(),
        )
    }

    fn sample_outcome(
        status: &str,
        final_score: Option<&str>,
        winner: Option<&str>,
    ) -> EventOutcomeRecord {
        EventOutcomeRecord {
            id: 1,
            event_id: "event-100".to_string(),
            status: status.to_string(),
            final_score: final_score.map(str::to_string),
            winner: winner.map(str::to_string),
            market_result: None,
            settled_at: sample_timestamp(),
        }
    }

    fn classify(position: &PositionRecord, outcome: &EventOutcomeRecord) -> Result<PositionOutcome, ClassificationError> {
        classify_position(&ResultParser::new(), &StrategyDispatcher::new(), position, outcome)
    }

    // =========================================================================
    // Classification Tests
    // =========================================================================

    #[test]
    fn test_classify_match_result_win() {
        let position = sample_position("Match Result", "Home", dec!(1.85));
        let outcome = sample_outcome("completed", Some("2-0"), Some("Home"));

        assert_eq!(classify(&position, &outcome).unwrap(), PositionOutcome::Won);
    }

    #[test]
    fn test_classify_over_under_from_score_string() {
        let position = sample_position("Over/Under", "Over 2.5", dec!(1.90));
        let outcome = sample_outcome("completed", Some("3:1"), None);

        assert_eq!(classify(&position, &outcome).unwrap(), PositionOutcome::Won);
    }

    #[test]
    fn test_classify_structured_payload() {
        let position = sample_position("BTTS", "Yes", dec!(1.72));
        let mut outcome = sample_outcome("completed", None, None);
        outcome.market_result = Some(json!({"bothTeamsScore": false}));

        assert_eq!(classify(&position, &outcome).unwrap(), PositionOutcome::Lost);
    }

    #[test]
    fn test_classify_cancelled_event_voids_every_market() {
        let outcome = sample_outcome("cancelled", Some("3-1"), Some("Home"));
        for (market, selection) in [
            ("Match Result", "Home"),
            ("Over/Under", "Over 2.5"),
            ("BTTS", "Yes"),
            ("Asian Handicap", "Home -1.5"),
            ("Correct Score", "3-1"),
        ] {
            let position = sample_position(market, selection, dec!(2.0));
            assert_eq!(classify(&position, &outcome).unwrap(), PositionOutcome::Void);
        }
    }

    #[test]
    fn test_classify_no_data_is_void() {
        let position = sample_position("Match Result", "Home", dec!(1.85));
        let outcome = sample_outcome("completed", None, None);

        assert_eq!(classify(&position, &outcome).unwrap(), PositionOutcome::Void);
    }

    #[test]
    fn test_classify_rejects_non_positive_odds() {
        let position = sample_position("Match Result", "Home", dec!(1.0));
        let outcome = sample_outcome("completed", None, Some("Home"));

        let err = classify(&position, &outcome).unwrap_err();
        assert!(matches!(err, ClassificationError::InvalidOdds { .. }));
    }

    #[test]
    fn test_classify_rejects_corrupt_status() {
        let mut position = sample_position("Match Result", "Home", dec!(1.85));
        position.status = "settledish".to_string();
        let outcome = sample_outcome("completed", None, Some("Home"));

        let err = classify(&position, &outcome).unwrap_err();
        assert!(matches!(err, ClassificationError::CorruptStatus { .. }));
    }

    // =========================================================================
    // Rank Tests
    // =========================================================================

    #[test]
    fn test_rank_of_leaderboard_position() {
        let leaderboard: Vec<ExpertStatisticsRecord> = [3i64, 9, 7]
            .iter()
            .map(|id| ExpertStatisticsRecord::empty(*id, sample_timestamp()))
            .collect();

        assert_eq!(rank_of(&leaderboard, 3), Some(1));
        assert_eq!(rank_of(&leaderboard, 7), Some(3));
        assert_eq!(rank_of(&leaderboard, 42), None);
        assert_eq!(rank_of(&[], 3), None);
    }

    // =========================================================================
    // Report Tests
    // =========================================================================

    #[test]
    fn test_report_total_settled() {
        let report = SettlementRunReport {
            settled_won: 3,
            settled_lost: 2,
            settled_void: 1,
            ..SettlementRunReport::default()
        };
        assert_eq!(report.total_settled(), 6);
        assert!(!report.cancelled);
    }
}
