//! Core configuration and domain events for the prediction settlement engine.
//!
//! This crate provides:
//! - Application configuration structs with sensible defaults
//! - Figment-based configuration loading (TOML + environment)
//! - Domain events emitted by the settlement pipeline

pub mod config;
pub mod config_loader;
pub mod events;

pub use config::{AppConfig, DatabaseConfig, SettlementJobConfig, StatisticsConfig};
pub use config_loader::ConfigLoader;
pub use events::SettlementEvent;
