//! Market label to strategy dispatch.

use crate::asian_handicap::AsianHandicapStrategy;
use crate::both_teams_score::BothTeamsScoreStrategy;
use crate::generic::GenericStrategy;
use crate::match_result::MatchResultStrategy;
use crate::over_under::OverUnderStrategy;
use crate::strategy::MarketStrategy;

static MATCH_RESULT: MatchResultStrategy = MatchResultStrategy;
static OVER_UNDER: OverUnderStrategy = OverUnderStrategy;
static BOTH_TEAMS_SCORE: BothTeamsScoreStrategy = BothTeamsScoreStrategy;
static ASIAN_HANDICAP: AsianHandicapStrategy = AsianHandicapStrategy;
static GENERIC: GenericStrategy = GenericStrategy;

/// Maps free-text market labels to settlement strategies.
///
/// Labels are matched case-insensitively after trimming; anything outside
/// the alias tables routes to [`GenericStrategy`] and settles Void.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyDispatcher;

impl StrategyDispatcher {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolves a market label to its settlement strategy.
    #[must_use]
    pub fn resolve(&self, market: &str) -> &'static dyn MarketStrategy {
        match market.trim().to_lowercase().as_str() {
            "match result" | "1x2" | "full time result" => &MATCH_RESULT,
            "over/under" | "total goals" | "o/u" => &OVER_UNDER,
            "both teams score" | "btts" => &BOTH_TEAMS_SCORE,
            "asian handicap" | "handicap" => &ASIAN_HANDICAP,
            _ => {
                tracing::warn!(market = market.trim(), "Unhandled market label, settling as void");
                &GENERIC
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_parser::{CanonicalResult, MatchWinner};
    use tipster_data::models::PositionOutcome;

    fn resolve(market: &str) -> &'static str {
        StrategyDispatcher::new().resolve(market).name()
    }

    #[test]
    fn test_match_result_aliases() {
        assert_eq!(resolve("Match Result"), "Match Result");
        assert_eq!(resolve("1X2"), "Match Result");
        assert_eq!(resolve("full time result"), "Match Result");
    }

    #[test]
    fn test_over_under_aliases() {
        assert_eq!(resolve("Over/Under"), "Over/Under");
        assert_eq!(resolve("Total Goals"), "Over/Under");
        assert_eq!(resolve("o/u"), "Over/Under");
    }

    #[test]
    fn test_both_teams_score_aliases() {
        assert_eq!(resolve("Both Teams Score"), "Both Teams Score");
        assert_eq!(resolve("BTTS"), "Both Teams Score");
    }

    #[test]
    fn test_asian_handicap_aliases() {
        assert_eq!(resolve("Asian Handicap"), "Asian Handicap");
        assert_eq!(resolve("Handicap"), "Asian Handicap");
    }

    #[test]
    fn test_whitespace_and_case_normalization() {
        assert_eq!(resolve("  MATCH RESULT  "), "Match Result");
        assert_eq!(resolve("btts "), "Both Teams Score");
    }

    #[test]
    fn test_unknown_labels_route_to_generic() {
        assert_eq!(resolve("Correct Score"), "Generic");
        assert_eq!(resolve(""), "Generic");
        assert_eq!(resolve("🎲"), "Generic");
    }

    #[test]
    fn test_unknown_market_voids_despite_structured_result() {
        let dispatcher = StrategyDispatcher::new();
        let result = CanonicalResult {
            winner: Some(MatchWinner::Home),
            total_goals: Some(4),
            ..CanonicalResult::default()
        };

        let outcome = dispatcher
            .resolve("Correct Score")
            .determine("3-1", Some(&result));
        assert_eq!(outcome, PositionOutcome::Void);
    }

    #[test]
    fn test_every_market_is_total_over_arbitrary_strings() {
        let dispatcher = StrategyDispatcher::new();
        let markets = ["Match Result", "Over/Under", "BTTS", "Handicap", "???"];
        let selections = ["", "Home", "Over x", "-", "Yes No", "\u{0}", "Über 2,5"];

        for market in markets {
            for selection in selections {
                // Must terminate and yield exactly one outcome, data or not
                let strategy = dispatcher.resolve(market);
                let _ = strategy.determine(selection, None);
                let _ = strategy.determine(selection, Some(&CanonicalResult::default()));
                let _ = strategy.determine(selection, Some(&CanonicalResult::void()));
            }
        }
    }
}
