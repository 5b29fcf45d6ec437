//! Match Result (1X2) settlement.

use crate::result_parser::{CanonicalResult, MatchWinner};
use crate::strategy::MarketStrategy;
use tipster_data::models::PositionOutcome;

/// Settles home/draw/away selections against the declared winner.
pub struct MatchResultStrategy;

fn map_selection(selection: &str) -> Option<MatchWinner> {
    let normalized = selection.trim().to_lowercase();

    match normalized.as_str() {
        "home" | "1" => return Some(MatchWinner::Home),
        "away" | "2" => return Some(MatchWinner::Away),
        "draw" | "x" => return Some(MatchWinner::Draw),
        _ => {}
    }

    // Longer labels like "Home Win" / "Away Win" match by containment.
    if normalized.contains("home") {
        Some(MatchWinner::Home)
    } else if normalized.contains("away") {
        Some(MatchWinner::Away)
    } else if normalized.contains("draw") {
        Some(MatchWinner::Draw)
    } else {
        None
    }
}

impl MarketStrategy for MatchResultStrategy {
    fn determine(&self, selection: &str, result: Option<&CanonicalResult>) -> PositionOutcome {
        let Some(result) = result else {
            return PositionOutcome::Void;
        };
        if result.voided {
            return PositionOutcome::Void;
        }
        let Some(winner) = result.winner else {
            return PositionOutcome::Void;
        };
        let Some(picked) = map_selection(selection) else {
            return PositionOutcome::Void;
        };

        if picked == winner {
            PositionOutcome::Won
        } else {
            PositionOutcome::Lost
        }
    }

    fn name(&self) -> &'static str {
        "Match Result"
    }
}
