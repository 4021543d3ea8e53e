//! Fleet runner - drives the rotation pipeline across the fleet
//!
//! One run enumerates accounts, lists principals, and pushes each passing
//! principal through decision, execution, distribution, and notification.
//! Failures are contained at the principal boundary: one principal's fatal
//! error never aborts the run for the others.

use std::sync::Arc;

use chrono::Utc;
use keyrotor_domain::constants::RUN_LOG_FILE;
use keyrotor_domain::{Config, Principal, Result, RunEventKind};
use tracing::{debug, error, info, warn};

use crate::distribution::ports::{ObjectStore, WorkingDir};
use crate::rotation::executor::LifecycleExecutor;
use crate::rotation::planner::plan_rotation;
use crate::rotation::ports::IdentityProvider;
use crate::runlog::RunLog;
use super::ports::{AllowList, Fleet};

/// Aggregate result of one rotation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Principals that went through the pipeline without a fatal error.
    pub principals_processed: usize,
    /// Principals whose rotation aborted on a fatal error.
    pub principals_failed: usize,
    /// Accounts the run could not enter at all.
    pub accounts_skipped: usize,
}

/// Runner iterating the fleet and containing per-principal failures
pub struct FleetRunner {
    fleet: Arc<dyn Fleet>,
    allow_list: Arc<dyn AllowList>,
    executor: LifecycleExecutor,
    store: Arc<dyn ObjectStore>,
    workdir: Arc<dyn WorkingDir>,
    run_log: Arc<RunLog>,
    config: Config,
}

impl FleetRunner {
    /// Create a new fleet runner
    pub fn new(
        fleet: Arc<dyn Fleet>,
        allow_list: Arc<dyn AllowList>,
        executor: LifecycleExecutor,
        store: Arc<dyn ObjectStore>,
        workdir: Arc<dyn WorkingDir>,
        run_log: Arc<RunLog>,
        config: Config,
    ) -> Self {
        Self { fleet, allow_list, executor, store, workdir, run_log, config }
    }

    /// Rotate every passing principal in every reachable account, then
    /// upload the run log (if enabled) and sweep the working directory.
    pub async fn run(&self) -> Result<RunSummary> {
        if self.config.run.dry_run {
            info!("dry run: provider create/delete operations are disabled");
        }

        let mut summary = RunSummary::default();
        let accounts = self.fleet.accounts().await?;
        info!(accounts = accounts.len(), "starting key rotation");

        for account in &accounts {
            let provider = match self.fleet.provider_for(account).await {
                Ok(provider) => provider,
                Err(err) => {
                    error!(account = %account.name, error = %err, "cannot enter account; skipping");
                    summary.accounts_skipped += 1;
                    continue;
                }
            };
            let principals = match provider.list_principals().await {
                Ok(principals) => principals,
                Err(err) => {
                    error!(account = %account.name, error = %err, "principal listing failed; skipping account");
                    summary.accounts_skipped += 1;
                    continue;
                }
            };

            for principal in &principals {
                match self.process_principal(provider.as_ref(), principal).await {
                    Ok(()) => summary.principals_processed += 1,
                    Err(err) => {
                        // Contained: the run carries on with the rest.
                        error!(principal = %principal, error = %err, "rotation failed for principal");
                        self.run_log.record(
                            &principal.account,
                            &principal.name,
                            RunEventKind::PrincipalFailed { error: err.to_string() },
                        );
                        summary.principals_failed += 1;
                    }
                }
            }
            info!(account = %account.name, "key rotation complete for account");
        }

        self.finish().await;
        Ok(summary)
    }

    async fn process_principal(
        &self,
        provider: &dyn IdentityProvider,
        principal: &Principal,
    ) -> Result<()> {
        if !self.allow_list.is_allowed(principal).await? {
            if self.allow_list.is_excluded(principal).await? {
                debug!(principal = %principal, "explicitly excluded; skipping");
                return Ok(());
            }
            self.run_log.record(
                &principal.account,
                &principal.name,
                RunEventKind::AllowListRejected,
            );
            if self.config.notify.notify_ops_on_missing {
                let kind = self
                    .executor
                    .notifier()
                    .missing_info(principal, "not present in the account registry")
                    .await;
                self.run_log.record(&principal.account, &principal.name, kind);
            }
            return Ok(());
        }

        let inventory = provider.list_keys(principal).await?;
        self.run_log.record(
            &principal.account,
            &principal.name,
            RunEventKind::InventoryChecked { keys: inventory.len() },
        );

        let plan = plan_rotation(&inventory)?;
        if plan.is_empty() {
            self.run_log.record(&principal.account, &principal.name, RunEventKind::NoAction);
            return Ok(());
        }

        self.executor.execute(provider, principal, &plan).await?;
        info!(principal = %principal, "key rotation complete");
        Ok(())
    }

    /// End-of-run bookkeeping, best-effort on both steps.
    async fn finish(&self) {
        if self.config.storage.upload_logs {
            let name = format!(
                "{}-{}",
                RUN_LOG_FILE.trim_end_matches(".log"),
                Utc::now().format("%Y-%m-%dT%H-%M-%SZ.log")
            );
            match self.store.put(&name, self.run_log.render().into_bytes()).await {
                Ok(location) => info!(location = %location, "run log uploaded"),
                Err(err) => warn!(error = %err, "run log upload failed"),
            }
        }

        // Plaintext working copies must not outlive the run, success or
        // failure, across all principals processed.
        match self.workdir.sweep().await {
            Ok(removed) => info!(removed, "transient credential files removed"),
            Err(err) => warn!(error = %err, "working directory sweep failed"),
        }
    }
}
