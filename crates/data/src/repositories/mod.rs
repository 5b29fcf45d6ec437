//! Database repositories for the prediction settlement engine.
//!
//! Each repository provides typed access to a specific table; batch
//! writes run inside a single transaction.

pub mod event_outcome_repo;
pub mod expert_repo;
pub mod expert_stats_repo;
pub mod position_repo;

pub use event_outcome_repo::EventOutcomeRepository;
pub use expert_repo::ExpertRepository;
pub use expert_stats_repo::ExpertStatisticsRepository;
pub use position_repo::{PositionRepository, PositionSettlement};

use sqlx::PgPool;

/// Creates all repositories from a single database pool.
pub struct Repositories {
    pub positions: PositionRepository,
    pub event_outcomes: EventOutcomeRepository,
    pub experts: ExpertRepository,
    pub expert_stats: ExpertStatisticsRepository,
}

impl Repositories {
    /// Creates a new set of repositories from a database pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            positions: PositionRepository::new(pool.clone()),
            event_outcomes: EventOutcomeRepository::new(pool.clone()),
            experts: ExpertRepository::new(pool.clone()),
            expert_stats: ExpertStatisticsRepository::new(pool),
        }
    }
}
