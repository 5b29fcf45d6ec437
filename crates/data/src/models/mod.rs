//! Data models for the prediction settlement engine.

pub mod event_outcome;
pub mod expert;
pub mod expert_stats;
pub mod position;

pub use event_outcome::{EventOutcomeRecord, EventStatus};
pub use expert::ExpertRecord;
pub use expert_stats::{ExpertStatisticsRecord, Tier};
pub use position::{CreatorType, PositionOutcome, PositionRecord, PositionStatus};
