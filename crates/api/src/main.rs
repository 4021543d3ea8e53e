//! KeyRotor - IAM access-key rotation service
//!
//! Main entry point for the rotation CLI.

use anyhow::Context as _;
use clap::Parser;

mod cli;
mod context;

use cli::Cli;
use context::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env before reading configuration
    let dotenv = dotenvy::dotenv().ok();

    let mut config = match &cli.config {
        Some(path) => keyrotor_infra::config::load_from_file(Some(path.clone()))?,
        None => keyrotor_infra::config::load()?,
    };
    cli.apply(&mut config);

    let _log_guard =
        keyrotor_infra::init_logging(&config.storage.log_dir, config.run.console_echo)
            .context("failed to initialize logging")?;

    if let Some(path) = dotenv {
        tracing::info!(path = %path.display(), "loaded .env");
    }
    tracing::info!(
        dry_run = config.run.dry_run,
        fleet = config.run.fleet,
        bucket = %config.storage.bucket,
        "keyrotor starting"
    );

    let ctx = AppContext::new(config).await?;
    let summary = ctx.runner.run().await?;

    tracing::info!(
        processed = summary.principals_processed,
        failed = summary.principals_failed,
        accounts_skipped = summary.accounts_skipped,
        dry_run = ctx.config.run.dry_run,
        "key rotation run complete"
    );

    if summary.principals_failed > 0 {
        anyhow::bail!("{} principal(s) failed to rotate", summary.principals_failed);
    }
    Ok(())
}
