//! Position data model.
//!
//! A position is a single prediction on one event/market/selection. It is
//! created pending and transitioned to a terminal state exactly once by the
//! settlement engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    /// Waiting for its event outcome.
    Pending,
    /// Settled as a win.
    Won,
    /// Settled as a loss.
    Lost,
    /// Settled stake-neutral (push, cancelled event, unparseable input).
    Void,
}

impl PositionStatus {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Void => "void",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            "void" => Some(Self::Void),
            _ => None,
        }
    }
}

/// Terminal outcome of a settled position. Mirrors the terminal statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionOutcome {
    Won,
    Lost,
    Void,
}

impl PositionOutcome {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Void => "void",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            "void" => Some(Self::Void),
            _ => None,
        }
    }

    /// The status a position carries once settled with this outcome.
    #[must_use]
    pub fn as_status(&self) -> PositionStatus {
        match self {
            Self::Won => PositionStatus::Won,
            Self::Lost => PositionStatus::Lost,
            Self::Void => PositionStatus::Void,
        }
    }
}

impl std::fmt::Display for PositionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who created a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatorType {
    /// A regular user; may map to an expert profile via lookup.
    User,
    /// An expert account.
    Expert,
}

impl CreatorType {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Expert => "expert",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Self::User),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }
}

/// A single prediction on one event/market/selection.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PositionRecord {
    /// Auto-generated position ID.
    pub id: i64,
    /// Creator account ID.
    pub creator_id: i64,
    /// Creator kind: "user" or "expert".
    pub creator_type: String,
    /// Sporting event this position is tied to.
    pub event_id: String,
    /// Free-text market label (e.g. "Match Result", "Over/Under").
    pub market: String,
    /// Free-text selection label (e.g. "Over 2.5", "Home -1.5", "Yes").
    pub selection: String,
    /// Decimal odds at creation.
    pub odds: Decimal,
    /// Lifecycle status: "pending", "won", "lost", "void".
    pub status: String,
    /// Terminal outcome after settlement, mirroring status.
    pub outcome: Option<String>,
    /// When the prediction was opened.
    pub created_at: DateTime<Utc>,
    /// When the settlement engine settled it.
    pub settled_at: Option<DateTime<Utc>>,
}

impl PositionRecord {
    /// Creates a new pending position (pre-settlement).
    #[must_use]
    pub fn new(
        creator_id: i64,
        creator_type: CreatorType,
        event_id: String,
        market: String,
        selection: String,
        odds: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0, // Will be set by database
            creator_id,
            creator_type: creator_type.as_str().to_string(),
            event_id,
            market,
            selection,
            odds,
            status: PositionStatus::Pending.as_str().to_string(),
            outcome: None,
            created_at,
            settled_at: None,
        }
    }

    /// Transitions the position to its terminal state.
    ///
    /// Settlement is final-once-set; callers must only invoke this on a
    /// pending position.
    pub fn settle(&mut self, outcome: PositionOutcome, settled_at: DateTime<Utc>) {
        self.status = outcome.as_status().as_str().to_string();
        self.outcome = Some(outcome.as_str().to_string());
        self.settled_at = Some(settled_at);
    }

    /// Returns true if this position is still waiting for settlement.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }

    /// Returns true if this position was settled as a win.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.status == "won"
    }

    /// Returns true if this position was settled as a loss.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.status == "lost"
    }

    /// Returns true if this position was voided.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.status == "void"
    }

    /// Returns true if this position reached any terminal state.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Returns the parsed lifecycle status.
    #[must_use]
    pub fn parsed_status(&self) -> Option<PositionStatus> {
        PositionStatus::parse(&self.status)
    }

    /// Returns the parsed terminal outcome, if settled.
    #[must_use]
    pub fn parsed_outcome(&self) -> Option<PositionOutcome> {
        self.outcome.as_deref().and_then(PositionOutcome::parse)
    }

    /// Returns the parsed creator type.
    #[must_use]
    pub fn parsed_creator_type(&self) -> Option<CreatorType> {
        CreatorType::parse(&self.creator_type)
    }

    /// Unit-stake return of a settled position.
    ///
    /// Win pays `odds - 1`, loss costs the stake, void returns it. `None`
    /// while the position is pending.
    #[must_use]
    pub fn roi(&self) -> Option<Decimal> {
        match self.parsed_outcome()? {
            PositionOutcome::Won => Some(self.odds - Decimal::ONE),
            PositionOutcome::Lost => Some(-Decimal::ONE),
            PositionOutcome::Void => Some(Decimal::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    // =========================================================================
    // Test Helpers
    // =========================================================================

    fn sample_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn sample_position() -> PositionRecord {
        PositionRecord::new(
            7,
            CreatorType::Expert,
            "event-100".to_string(),
            "Match Result".to_string(),
            "Home".to_string(),
            dec!(1.85),
            sample_timestamp(),
        )
    }

    // =========================================================================
    // Enum Tests
    // =========================================================================

    #[test]
    fn test_position_status_as_str() {
        assert_eq!(PositionStatus::Pending.as_str(), "pending");
        assert_eq!(PositionStatus::Won.as_str(), "won");
        assert_eq!(PositionStatus::Lost.as_str(), "lost");
        assert_eq!(PositionStatus::Void.as_str(), "void");
    }

    #[test]
    fn test_position_status_parse() {
        assert_eq!(PositionStatus::parse("pending"), Some(PositionStatus::Pending));
        assert_eq!(PositionStatus::parse("WON"), Some(PositionStatus::Won));
        assert_eq!(PositionStatus::parse("Void"), Some(PositionStatus::Void));
        assert_eq!(PositionStatus::parse("settled"), None);
    }

    #[test]
    fn test_position_outcome_mirrors_status() {
        assert_eq!(PositionOutcome::Won.as_status(), PositionStatus::Won);
        assert_eq!(PositionOutcome::Lost.as_status(), PositionStatus::Lost);
        assert_eq!(PositionOutcome::Void.as_status(), PositionStatus::Void);
    }

    #[test]
    fn test_creator_type_parse() {
        assert_eq!(CreatorType::parse("user"), Some(CreatorType::User));
        assert_eq!(CreatorType::parse("Expert"), Some(CreatorType::Expert));
        assert_eq!(CreatorType::parse("bot"), None);
    }

    // =========================================================================
    // PositionRecord Tests
    // =========================================================================

    #[test]
    fn test_new_position_is_pending() {
        let position = sample_position();

        assert_eq!(position.event_id, "event-100");
        assert_eq!(position.market, "Match Result");
        assert_eq!(position.selection, "Home");
        assert_eq!(position.odds, dec!(1.85));
        assert!(position.is_pending());
        assert!(!position.is_settled());
        assert!(position.outcome.is_none());
        assert!(position.settled_at.is_none());
    }

    #[test]
    fn test_settle_won() {
        let mut position = sample_position();
        let settled_at = sample_timestamp() + chrono::Duration::hours(3);

        position.settle(PositionOutcome::Won, settled_at);

        assert!(position.is_won());
        assert!(position.is_settled());
        assert!(!position.is_pending());
        assert_eq!(position.outcome, Some("won".to_string()));
        assert_eq!(position.settled_at, Some(settled_at));
        assert_eq!(position.parsed_outcome(), Some(PositionOutcome::Won));
    }

    #[test]
    fn test_settle_lost() {
        let mut position = sample_position();
        position.settle(PositionOutcome::Lost, sample_timestamp());

        assert!(position.is_lost());
        assert_eq!(position.parsed_status(), Some(PositionStatus::Lost));
    }

    #[test]
    fn test_settle_void() {
        let mut position = sample_position();
        position.settle(PositionOutcome::Void, sample_timestamp());

        assert!(position.is_void());
        assert_eq!(position.outcome, Some("void".to_string()));
    }

    #[test]
    fn test_roi_pending_is_none() {
        assert_eq!(sample_position().roi(), None);
    }

    #[test]
    fn test_roi_per_outcome() {
        let mut won = sample_position();
        won.settle(PositionOutcome::Won, sample_timestamp());
        // odds 1.85 -> unit profit 0.85
        assert_eq!(won.roi(), Some(dec!(0.85)));

        let mut lost = sample_position();
        lost.settle(PositionOutcome::Lost, sample_timestamp());
        assert_eq!(lost.roi(), Some(dec!(-1)));

        let mut void = sample_position();
        void.settle(PositionOutcome::Void, sample_timestamp());
        assert_eq!(void.roi(), Some(dec!(0)));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let position = sample_position();

        let json = serde_json::to_string(&position).expect("serialization failed");
        let back: PositionRecord = serde_json::from_str(&json).expect("deserialization failed");

        assert_eq!(position.event_id, back.event_id);
        assert_eq!(position.market, back.market);
        assert_eq!(position.selection, back.selection);
        assert_eq!(position.odds, back.odds);
        assert_eq!(position.status, back.status);
    }
}
