use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub settlement: SettlementJobConfig,
    pub statistics: StatisticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Settings for the scheduled settlement batch job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementJobConfig {
    /// Whether the scheduled job runs at all.
    pub enabled: bool,
    /// Cron expression for the batch cadence.
    pub cron_schedule: String,
    /// How far back to look for newly settled event outcomes, in hours.
    pub lookback_hours: i64,
    /// Attempts per scheduled firing before giving up until the next one.
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Number of leaderboard slots that count as "ranked".
    pub leaderboard_size: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/tipster".to_string(),
                max_connections: 10,
            },
            settlement: SettlementJobConfig {
                enabled: true,
                cron_schedule: "0 */5 * * * *".to_string(),
                lookback_hours: 24,
                max_attempts: 3,
            },
            statistics: StatisticsConfig {
                leaderboard_size: 10,
            },
        }
    }
}
