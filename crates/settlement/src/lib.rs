//! Market settlement engine.
//!
//! Converts a recorded sport event outcome plus a position's market and
//! selection labels into exactly one of Won/Lost/Void. Settlement is a
//! total function: malformed scores, unknown markets, and unrecognized
//! selections all resolve to Void rather than an error.

pub mod asian_handicap;
pub mod both_teams_score;
pub mod dispatcher;
pub mod generic;
pub mod match_result;
pub mod over_under;
pub mod result_parser;
pub mod strategy;

pub use asian_handicap::AsianHandicapStrategy;
pub use both_teams_score::BothTeamsScoreStrategy;
pub use dispatcher::StrategyDispatcher;
pub use generic::GenericStrategy;
pub use match_result::MatchResultStrategy;
pub use over_under::OverUnderStrategy;
pub use result_parser::{CanonicalResult, MarketResultPayload, MatchWinner, ResultParser};
pub use strategy::MarketStrategy;
