use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use tipster_core::{AppConfig, ConfigLoader};
use tipster_data::{DatabaseClient, Repositories};
use tipster_orchestrator::{
    SettlementEventBus, SettlementOrchestrator, SettlementScheduler,
};
use tipster_settlement::{ResultParser, StrategyDispatcher};

#[derive(Parser)]
#[command(name = "tipster")]
#[command(about = "Settlement and statistics engine for sports predictions", long_about = None)]
struct Cli {
    /// Optional config profile (merges config/Config.<profile>.toml)
    #[arg(short, long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the settlement daemon (cron-scheduled batches)
    Run,
    /// Execute one settlement batch and exit
    Settle,
    /// Recalculate statistics for one expert and exit
    RecalcStats {
        /// Expert ID to recalculate
        #[arg(long)]
        expert_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match cli.profile.as_deref() {
        Some(profile) => ConfigLoader::load_with_profile(profile)?,
        None => ConfigLoader::load()?,
    };

    match cli.command {
        Commands::Run => run_daemon(config).await?,
        Commands::Settle => run_settle_once(config).await?,
        Commands::RecalcStats { expert_id } => run_recalc_stats(config, expert_id).await?,
    }

    Ok(())
}

async fn build_orchestrator(config: &AppConfig) -> Result<SettlementOrchestrator> {
    let db = DatabaseClient::new(&config.database.url, config.database.max_connections).await?;
    let repos = Repositories::new(db.pool());

    Ok(SettlementOrchestrator::new(
        repos,
        ResultParser::new(),
        StrategyDispatcher::new(),
        SettlementEventBus::default(),
        config.settlement.lookback_hours,
        config.statistics.leaderboard_size,
    ))
}

async fn run_daemon(config: AppConfig) -> Result<()> {
    let orchestrator = Arc::new(build_orchestrator(&config).await?);
    let scheduler = SettlementScheduler::new(config.settlement.clone(), orchestrator);
    scheduler.start().await
}

async fn run_settle_once(config: AppConfig) -> Result<()> {
    let orchestrator = build_orchestrator(&config).await?;
    let report = orchestrator.run_once(Utc::now()).await?;

    info!(
        outcomes = report.outcomes_discovered,
        candidates = report.candidates,
        won = report.settled_won,
        lost = report.settled_lost,
        void = report.settled_void,
        failures = report.failures.len(),
        experts = report.experts_recalculated,
        "Settlement batch finished"
    );

    Ok(())
}

async fn run_recalc_stats(config: AppConfig, expert_id: i64) -> Result<()> {
    let orchestrator = build_orchestrator(&config).await?;

    if !orchestrator.recalculate_expert(expert_id, Utc::now()).await? {
        anyhow::bail!("Expert {expert_id} not found");
    }

    info!(expert_id, "Statistics recalculated");
    Ok(())
}
