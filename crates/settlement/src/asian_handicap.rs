//! Asian Handicap settlement.
//!
//! Selections take the shape `<Side> <SignedDecimal>` ("Home -1.5",
//! "Away +0.5"): an explicit sign, at most one decimal place. The named
//! side's score plus the handicap is compared against the other side's
//! raw score; exact equality is a push.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::result_parser::CanonicalResult;
use crate::strategy::MarketStrategy;
use tipster_data::models::PositionOutcome;

/// Settles handicap-line selections against the raw match score.
pub struct AsianHandicapStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Home,
    Away,
}

fn parse_handicap(token: &str) -> Option<Decimal> {
    let magnitude = token
        .strip_prefix('+')
        .or_else(|| token.strip_prefix('-'))?;

    let (int_part, frac_part) = match magnitude.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (magnitude, None),
    };

    if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac_part {
        if frac.len() != 1 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    }

    Decimal::from_str(token).ok()
}

fn parse_selection(selection: &str) -> Option<(Side, Decimal)> {
    let mut tokens = selection.split_whitespace();
    let side_token = tokens.next()?;
    let line_token = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let side = match side_token.to_lowercase().as_str() {
        "home" => Side::Home,
        "away" => Side::Away,
        _ => return None,
    };

    Some((side, parse_handicap(line_token)?))
}

impl MarketStrategy for AsianHandicapStrategy {
    fn determine(&self, selection: &str, result: Option<&CanonicalResult>) -> PositionOutcome {
        let Some(result) = result else {
            return PositionOutcome::Void;
        };
        if result.voided {
            return PositionOutcome::Void;
        }
        let (Some(home), Some(away)) = (result.home_score, result.away_score) else {
            return PositionOutcome::Void;
        };
        let Some((side, handicap)) = parse_selection(selection) else {
            return PositionOutcome::Void;
        };

        let home = Decimal::from(home);
        let away = Decimal::from(away);
        let (adjusted, opponent) = match side {
            Side::Home => (home + handicap, away),
            Side::Away => (away + handicap, home),
        };

        match adjusted.cmp(&opponent) {
            Ordering::Greater => PositionOutcome::Won,
            Ordering::Less => PositionOutcome::Lost,
            Ordering::Equal => PositionOutcome::Void,
        }
    }

    fn name(&self) -> &'static str {
        "Asian Handicap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn result_with_score(home: u32, away: u32) -> CanonicalResult {
        CanonicalResult {
            home_score: Some(home),
            away_score: Some(away),
            ..CanonicalResult::default()
        }
    }

    fn determine(selection: &str, result: &CanonicalResult) -> PositionOutcome {
        AsianHandicapStrategy.determine(selection, Some(result))
    }

    // =========================================================================
    // Selection Shape Tests
    // =========================================================================

    #[test]
    fn test_parse_handicap_shapes() {
        assert_eq!(parse_handicap("-1.5"), Some(dec!(-1.5)));
        assert_eq!(parse_handicap("+0.5"), Some(dec!(0.5)));
        assert_eq!(parse_handicap("-1"), Some(dec!(-1)));
        // no sign, too many decimals, junk
        assert_eq!(parse_handicap("0"), None);
        assert_eq!(parse_handicap("1.5"), None);
        assert_eq!(parse_handicap("-1.25"), None);
        assert_eq!(parse_handicap("-1."), None);
        assert_eq!(parse_handicap("-"), None);
        assert_eq!(parse_handicap("-one"), None);
    }

    #[test]
    fn test_invalid_shapes_are_void() {
        let result = result_with_score(2, 1);
        assert_eq!(determine("Home 0", &result), PositionOutcome::Void);
        assert_eq!(determine("Home 2", &result), PositionOutcome::Void);
        assert_eq!(determine("Home", &result), PositionOutcome::Void);
        assert_eq!(determine("Home -1.5 extra", &result), PositionOutcome::Void);
        assert_eq!(determine("Middle -1.5", &result), PositionOutcome::Void);
        assert_eq!(determine("", &result), PositionOutcome::Void);
    }

    // =========================================================================
    // Settlement Tests
    // =========================================================================

    #[test]
    fn test_favorite_covers_negative_line() {
        // adjusted home = 3 - 1.5 = 1.5 > away 1
        assert_eq!(
            determine("Home -1.5", &result_with_score(3, 1)),
            PositionOutcome::Won
        );
        // adjusted home = 2 - 1.5 = 0.5 < away 1
        assert_eq!(
            determine("Home -1.5", &result_with_score(2, 1)),
            PositionOutcome::Lost
        );
    }

    #[test]
    fn test_whole_number_line_push() {
        // adjusted home = 2 - 1 = 1 == away 1
        assert_eq!(
            determine("Home -1", &result_with_score(2, 1)),
            PositionOutcome::Void
        );
    }

    #[test]
    fn test_underdog_positive_line() {
        // away loses 1-2 but +1.5 covers: 1 + 1.5 = 2.5 > 2
        assert_eq!(
            determine("Away +1.5", &result_with_score(2, 1)),
            PositionOutcome::Won
        );
        // away 0 + 0.5 = 0.5 < home 2
        assert_eq!(
            determine("Away +0.5", &result_with_score(2, 0)),
            PositionOutcome::Lost
        );
    }

    #[test]
    fn test_case_insensitive_side() {
        assert_eq!(
            determine("home -1.5", &result_with_score(3, 1)),
            PositionOutcome::Won
        );
        assert_eq!(
            determine("AWAY +1.5", &result_with_score(2, 1)),
            PositionOutcome::Won
        );
    }

    #[test]
    fn test_missing_scores_are_void() {
        assert_eq!(
            determine("Home -1.5", &CanonicalResult::default()),
            PositionOutcome::Void
        );
        let partial = CanonicalResult {
            home_score: Some(2),
            ..CanonicalResult::default()
        };
        assert_eq!(determine("Home -1.5", &partial), PositionOutcome::Void);
        assert_eq!(
            AsianHandicapStrategy.determine("Home -1.5", None),
            PositionOutcome::Void
        );
    }

    #[test]
    fn test_voided_result_wins_over_scores() {
        let mut result = result_with_score(3, 1);
        result.voided = true;
        assert_eq!(determine("Home -1.5", &result), PositionOutcome::Void);
    }
}
