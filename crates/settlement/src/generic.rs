//! Fallback settlement for uncatalogued market labels.

use crate::result_parser::CanonicalResult;
use crate::strategy::MarketStrategy;
use tipster_data::models::PositionOutcome;

/// Unconditional Void. Keeps the dispatcher total over every possible
/// market label; no inference is attempted from whatever result data
/// happens to exist.
pub struct GenericStrategy;

impl MarketStrategy for GenericStrategy {
    fn determine(&self, _selection: &str, _result: Option<&CanonicalResult>) -> PositionOutcome {
        PositionOutcome::Void
    }

    fn name(&self) -> &'static str {
        "Generic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_parser::MatchWinner;

    #[test]
    fn test_always_void() {
        let strategy = GenericStrategy;
        assert_eq!(strategy.determine("anything", None), PositionOutcome::Void);

        // Even with a fully-populated result
        let result = CanonicalResult {
            winner: Some(MatchWinner::Home),
            total_goals: Some(4),
            both_teams_scored: Some(true),
            home_score: Some(3),
            away_score: Some(1),
            voided: false,
        };
        assert_eq!(
            strategy.determine("Home", Some(&result)),
            PositionOutcome::Void
        );
    }
}
