//! Command-line interface
//!
//! Flags override whatever the environment or config file provided; the
//! merged result is one immutable `Config` handed to the runner.

use std::path::PathBuf;

use clap::Parser;
use keyrotor_domain::Config;

/// Rotates IAM access keys across one or more accounts
#[derive(Debug, Parser)]
#[command(name = "keyrotor", version, about)]
pub struct Cli {
    /// Path to a JSON or TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress provider create/delete calls (rehearsal mode)
    #[arg(long)]
    pub dry_run: bool,

    /// Enable provider mutations, overriding a configured dry-run
    #[arg(long, conflicts_with = "dry_run")]
    pub production: bool,

    /// Loop every registry account via role assumption
    #[arg(long)]
    pub fleet: bool,

    /// Account name used in single-account mode
    #[arg(long, value_name = "NAME")]
    pub account: Option<String>,

    /// Upload the run log to the artifact bucket at run end
    #[arg(long)]
    pub upload_logs: bool,

    /// Echo log output to stdout
    #[arg(long)]
    pub console: bool,
}

impl Cli {
    /// Fold the flags into a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if self.dry_run {
            config.run.dry_run = true;
        }
        if self.production {
            config.run.dry_run = false;
        }
        if self.fleet {
            config.run.fleet = true;
        }
        if let Some(account) = &self.account {
            config.run.account = account.clone();
        }
        if self.upload_logs {
            config.storage.upload_logs = true;
        }
        if self.console {
            config.run.console_echo = true;
        }
    }
}
