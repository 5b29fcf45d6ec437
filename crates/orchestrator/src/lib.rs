//! Batch settlement orchestration.
//!
//! This crate owns the I/O boundary of the settlement pipeline: it
//! discovers newly settled event outcomes, classifies pending positions
//! through the pure settlement engine, persists transitions, fans out
//! domain events, and recomputes statistics per affected expert on a
//! cron cadence.

pub mod bus;
pub mod orchestrator;
pub mod scheduler;

pub use bus::SettlementEventBus;
pub use orchestrator::{
    classify_position, rank_of, ClassificationError, PositionFailure, SettlementOrchestrator,
    SettlementRunReport,
};
pub use scheduler::SettlementScheduler;
