//! Sport event outcome data model.
//!
//! Outcomes are produced by the external odds-ingestion job and are
//! immutable once recorded; the settlement engine only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Lifecycle status of a sporting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

impl EventStatus {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Live => "live",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "live" => Some(Self::Live),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Recorded outcome of one sporting event.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventOutcomeRecord {
    /// Auto-generated row ID.
    pub id: i64,
    /// External event identifier positions reference.
    pub event_id: String,
    /// Event lifecycle status: "scheduled", "live", "completed", "cancelled".
    pub status: String,
    /// Free-text final score, e.g. "3-1" or "3:1".
    pub final_score: Option<String>,
    /// Declared winner token: "Home", "Away" or "Draw" (case-insensitive).
    pub winner: Option<String>,
    /// Structured per-market results payload (JSONB).
    pub market_result: Option<JsonValue>,
    /// When the outcome became available.
    pub settled_at: DateTime<Utc>,
}

impl EventOutcomeRecord {
    /// Returns the parsed event status.
    #[must_use]
    pub fn parsed_status(&self) -> Option<EventStatus> {
        EventStatus::parse(&self.status)
    }

    /// Returns true if the event was cancelled outright.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.parsed_status() == Some(EventStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_outcome() -> EventOutcomeRecord {
        EventOutcomeRecord {
            id: 1,
            event_id: "event-100".to_string(),
            status: "completed".to_string(),
            final_score: Some("3-1".to_string()),
            winner: Some("Home".to_string()),
            market_result: Some(json!({"totalGoals": 4, "bothTeamsScore": true})),
            settled_at: Utc.with_ymd_and_hms(2025, 3, 1, 17, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_event_status_parse() {
        assert_eq!(EventStatus::parse("completed"), Some(EventStatus::Completed));
        assert_eq!(EventStatus::parse("CANCELLED"), Some(EventStatus::Cancelled));
        assert_eq!(EventStatus::parse("postponed"), None);
    }

    #[test]
    fn test_parsed_status_and_cancellation() {
        let mut outcome = sample_outcome();
        assert_eq!(outcome.parsed_status(), Some(EventStatus::Completed));
        assert!(!outcome.is_cancelled());

        outcome.status = "cancelled".to_string();
        assert!(outcome.is_cancelled());
    }
}
