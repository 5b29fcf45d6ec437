//! Over/Under (total goals) settlement.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::result_parser::CanonicalResult;
use crate::strategy::MarketStrategy;
use tipster_data::models::PositionOutcome;

/// Settles total-goals line selections like "Over 2.5" or "Under 3".
pub struct OverUnderStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Over,
    Under,
}

fn extract_direction(selection: &str) -> Option<Direction> {
    let normalized = selection.to_lowercase();
    if normalized.contains("over") {
        Some(Direction::Over)
    } else if normalized.contains("under") {
        Some(Direction::Under)
    } else {
        None
    }
}

fn extract_line(selection: &str) -> Option<Decimal> {
    selection
        .split_whitespace()
        .find_map(|token| Decimal::from_str(token).ok())
}

impl MarketStrategy for OverUnderStrategy {
    fn determine(&self, selection: &str, result: Option<&CanonicalResult>) -> PositionOutcome {
        let Some(result) = result else {
            return PositionOutcome::Void;
        };
        if result.voided {
            return PositionOutcome::Void;
        }
        let Some(goals) = result.total_goals else {
            return PositionOutcome::Void;
        };
        let Some(direction) = extract_direction(selection) else {
            return PositionOutcome::Void;
        };
        let Some(line) = extract_line(selection) else {
            return PositionOutcome::Void;
        };

        match (Decimal::from(goals).cmp(&line), direction) {
            (Ordering::Greater, Direction::Over) | (Ordering::Less, Direction::Under) => {
                PositionOutcome::Won
            }
            // Exact hit on a whole-number line is a push
            (Ordering::Equal, _) => PositionOutcome::Void,
            _ => PositionOutcome::Lost,
        }
    }

    fn name(&self) -> &'static str {
        "Over/Under"
    }
}
