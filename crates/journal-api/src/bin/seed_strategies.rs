//! journal-seed: reset the strategy registry to the default taxonomy.
//!
//! Replaces every stored strategy. Charts are untouched, so charts that
//! referenced a removed strategy keep their raw value.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use journal_api::telemetry::{init_tracing, LogSettings};
use journal_core::defaults::DEFAULT_STRATEGIES;
use journal_core::{CreateStrategyRequest, StrategyRepository};
use journal_db::Database;

#[derive(Parser)]
#[command(name = "journal-seed")]
#[command(author, version, about = "Seed the trading journal strategy registry")]
struct Cli {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Apply pending migrations before seeding
    #[arg(long)]
    migrate: bool,

    /// Print the strategies that would be written and exit
    #[arg(long)]
    dry_run: bool,
}

fn default_requests() -> Vec<CreateStrategyRequest> {
    DEFAULT_STRATEGIES
        .iter()
        .map(|(value, label)| CreateStrategyRequest::new(*value, *label))
        .collect()
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _guard = init_tracing("journal_seed=info,journal_db=info", &LogSettings::from_env());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let requests = default_requests();

    if cli.dry_run {
        for req in &requests {
            println!("{}\t{}", req.value, req.label);
        }
        return Ok(());
    }

    let db = Database::connect(&cli.database_url).await?;
    if cli.migrate {
        db.migrate().await?;
    }

    let written = db.strategies.replace_all(requests).await?;
    info!(
        subsystem = "seed",
        result_count = written.len(),
        "Strategy registry seeded"
    );
    for strategy in &written {
        println!("{}\t{}\t{}", strategy.id, strategy.value, strategy.label);
    }

    db.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_requests_are_valid() {
        let requests = default_requests();
        assert_eq!(requests.len(), DEFAULT_STRATEGIES.len());
        assert!(requests.iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "journal-seed",
            "--database-url",
            "postgres://localhost/journal",
            "--dry-run",
        ]);
        assert!(cli.dry_run);
        assert!(!cli.migrate);
    }
}
