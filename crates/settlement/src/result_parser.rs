//! Normalization of raw event outcomes into a canonical result.
//!
//! An outcome may carry a structured per-market payload, a free-text
//! final score, a declared winner, or any subset of those. The parser
//! prefers structured fields and falls back to the score string;
//! cancelled or abandoned events force Void regardless of other data.

use serde::Deserialize;
use tipster_data::models::EventOutcomeRecord;

/// Declared winner of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchWinner {
    Home,
    Away,
    Draw,
}

impl MatchWinner {
    /// Parses a winner token, case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "home" => Some(Self::Home),
            "away" => Some(Self::Away),
            "draw" => Some(Self::Draw),
            _ => None,
        }
    }
}

/// Structured market-results payload attached to an event outcome.
///
/// All fields are optional; ingestion sources differ in what they supply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketResultPayload {
    pub match_result: Option<String>,
    pub total_goals: Option<u32>,
    pub both_teams_score: Option<bool>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub cancelled: Option<bool>,
    pub abandoned: Option<bool>,
}

impl MarketResultPayload {
    fn is_void_forcing(&self) -> bool {
        self.cancelled.unwrap_or(false) || self.abandoned.unwrap_or(false)
    }
}

/// Normalized view of an event outcome. Ephemeral: recomputed per
/// settlement attempt, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalResult {
    pub winner: Option<MatchWinner>,
    pub total_goals: Option<u32>,
    pub both_teams_scored: Option<bool>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    /// The event was cancelled or abandoned; every strategy must settle
    /// it as Void regardless of other fields.
    pub voided: bool,
}

impl CanonicalResult {
    /// A void-forcing result for cancelled/abandoned events.
    #[must_use]
    pub fn void() -> Self {
        Self {
            voided: true,
            ..Self::default()
        }
    }
}

/// Parses free-text final scores like "3-1", "3:1" or "3 1".
///
/// Malformed strings (non-numeric parts, wrong token count) are
/// unparsable, not an error.
#[must_use]
pub fn parse_score(raw: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = raw
        .trim()
        .split(|c: char| c == '-' || c == ':' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() != 2 {
        return None;
    }

    let home = parts[0].parse().ok()?;
    let away = parts[1].parse().ok()?;
    Some((home, away))
}

/// Normalizes raw settlement payloads into [`CanonicalResult`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultParser;

impl ResultParser {
    /// Creates a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the canonical result for an event outcome.
    ///
    /// Returns `None` when neither structured fields nor a parseable
    /// score string exist ("no data", which settles as Void downstream).
    #[must_use]
    pub fn parse(&self, outcome: &EventOutcomeRecord) -> Option<CanonicalResult> {
        let payload = outcome
            .market_result
            .as_ref()
            .and_then(|value| serde_json::from_value::<MarketResultPayload>(value.clone()).ok());

        if outcome.is_cancelled() || payload.as_ref().is_some_and(MarketResultPayload::is_void_forcing)
        {
            return Some(CanonicalResult::void());
        }

        let score = outcome.final_score.as_deref().and_then(parse_score);

        // Structured fields win over anything derived from the score string.
        let winner = payload
            .as_ref()
            .and_then(|p| p.match_result.as_deref())
            .and_then(MatchWinner::parse)
            .or_else(|| outcome.winner.as_deref().and_then(MatchWinner::parse));

        let home_score = payload
            .as_ref()
            .and_then(|p| p.home_score)
            .or_else(|| score.map(|(home, _)| home));
        let away_score = payload
            .as_ref()
            .and_then(|p| p.away_score)
            .or_else(|| score.map(|(_, away)| away));

        let total_goals = payload
            .as_ref()
            .and_then(|p| p.total_goals)
            .or_else(|| score.map(|(home, away)| home + away));

        let both_teams_scored = payload
            .as_ref()
            .and_then(|p| p.both_teams_score)
            .or_else(|| match (home_score, away_score) {
                (Some(home), Some(away)) => Some(home > 0 && away > 0),
                _ => None,
            });

        let result = CanonicalResult {
            winner,
            total_goals,
            both_teams_scored,
            home_score,
            away_score,
            voided: false,
        };

        let no_data = result.winner.is_none()
            && result.total_goals.is_none()
            && result.both_teams_scored.is_none()
            && result.home_score.is_none()
            && result.away_score.is_none();

        if no_data {
            None
        } else {
            Some(result)
        }
    }
}
