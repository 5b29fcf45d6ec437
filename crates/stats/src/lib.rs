//! Expert performance statistics.
//!
//! Recomputes an expert's full statistics snapshot (counts, win rates,
//! streaks, rolling windows, tier) from their complete position history.

pub mod engine;

pub use engine::StatisticsEngine;
