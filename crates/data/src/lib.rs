//! Data storage and management for the prediction settlement engine.
//!
//! This crate provides:
//! - Database client for `PostgreSQL`
//! - Data models for positions, event outcomes, experts, and statistics
//! - Repositories for typed database access

pub mod database;
pub mod models;
pub mod repositories;

pub use database::DatabaseClient;

// Re-export models
pub use models::{
    CreatorType, EventOutcomeRecord, EventStatus, ExpertRecord, ExpertStatisticsRecord,
    PositionOutcome, PositionRecord, PositionStatus, Tier,
};

// Re-export repositories
pub use repositories::{
    EventOutcomeRepository, ExpertRepository, ExpertStatisticsRepository, PositionRepository,
    PositionSettlement, Repositories,
};
