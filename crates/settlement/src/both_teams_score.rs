//! Both Teams To Score settlement.

use crate::result_parser::CanonicalResult;
use crate::strategy::MarketStrategy;
use tipster_data::models::PositionOutcome;

/// Settles yes/no selections against whether both sides scored.
pub struct BothTeamsScoreStrategy;

fn map_selection(selection: &str) -> Option<bool> {
    match selection.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

impl MarketStrategy for BothTeamsScoreStrategy {
    fn determine(&self, selection: &str, result: Option<&CanonicalResult>) -> PositionOutcome {
        let Some(result) = result else {
            return PositionOutcome::Void;
        };
        if result.voided {
            return PositionOutcome::Void;
        }
        let Some(both_scored) = result.both_teams_scored else {
            return PositionOutcome::Void;
        };
        let Some(picked_yes) = map_selection(selection) else {
            return PositionOutcome::Void;
        };

        if picked_yes == both_scored {
            PositionOutcome::Won
        } else {
            PositionOutcome::Lost
        }
    }

    fn name(&self) -> &'static str {
        "Both Teams Score"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_btts(both_scored: bool) -> CanonicalResult {
        CanonicalResult {
            both_teams_scored: Some(both_scored),
            ..CanonicalResult::default()
        }
    }

    fn determine(selection: &str, result: &CanonicalResult) -> PositionOutcome {
        BothTeamsScoreStrategy.determine(selection, Some(result))
    }

    #[test]
    fn test_yes_selection() {
        assert_eq!(determine("Yes", &result_with_btts(true)), PositionOutcome::Won);
        assert_eq!(determine("Yes", &result_with_btts(false)), PositionOutcome::Lost);
    }

    #[test]
    fn test_no_selection() {
        assert_eq!(determine("No", &result_with_btts(false)), PositionOutcome::Won);
        assert_eq!(determine("No", &result_with_btts(true)), PositionOutcome::Lost);
    }

    #[test]
    fn test_alternate_tokens() {
        // "True"/"1" behave as Yes; "False"/"0" as No
        assert_eq!(determine("True", &result_with_btts(true)), PositionOutcome::Won);
        assert_eq!(determine("1", &result_with_btts(true)), PositionOutcome::Won);
        assert_eq!(determine("False", &result_with_btts(false)), PositionOutcome::Won);
        assert_eq!(determine("0", &result_with_btts(true)), PositionOutcome::Lost);
    }

    #[test]
    fn test_unrecognized_selection_is_void() {
        assert_eq!(determine("maybe", &result_with_btts(true)), PositionOutcome::Void);
        assert_eq!(determine("", &result_with_btts(true)), PositionOutcome::Void);
    }

    #[test]
    fn test_missing_data_is_void() {
        assert_eq!(
            determine("Yes", &CanonicalResult::default()),
            PositionOutcome::Void
        );
        assert_eq!(
            BothTeamsScoreStrategy.determine("Yes", None),
            PositionOutcome::Void
        );
        assert_eq!(
            determine("Yes", &CanonicalResult::void()),
            PositionOutcome::Void
        );
    }
}
