//! Key lifecycle executor - drives a plan's side effects
//!
//! Executes one principal's rotation plan against the identity provider
//! with the ordering invariant intact: a planned delete completes (or
//! aborts the principal) before the replacement is created, so a transient
//! third key can never outlast the point of failure.

use std::sync::Arc;

use keyrotor_domain::{
    ciphertext_name, plaintext_name, DistributionOutcome, IssuedKey, KeyRecord, Principal, Result,
    RotationAction, RotationPlan, RunEventKind,
};
use tracing::{info, warn};

use crate::distribution::ports::{ObjectStore, WorkingDir};
use crate::distribution::DistributionPipeline;
use crate::notify::NotificationDispatcher;
use crate::runlog::RunLog;
use super::ports::IdentityProvider;

/// What one principal's execution actually did
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Key id removed from the provider, if the plan retired one.
    pub deleted: Option<String>,
    /// Replacement key record, absent in dry-run mode.
    pub created: Option<KeyRecord>,
    /// Distribution outcome for the replacement, if one was minted.
    pub outcome: Option<DistributionOutcome>,
}

/// Executor for rotation plans
pub struct LifecycleExecutor {
    distribution: DistributionPipeline,
    notifier: Arc<NotificationDispatcher>,
    store: Arc<dyn ObjectStore>,
    workdir: Arc<dyn WorkingDir>,
    run_log: Arc<RunLog>,
    dry_run: bool,
    notify_ops_on_missing: bool,
}

impl LifecycleExecutor {
    /// Create a new lifecycle executor
    pub fn new(
        distribution: DistributionPipeline,
        notifier: Arc<NotificationDispatcher>,
        store: Arc<dyn ObjectStore>,
        workdir: Arc<dyn WorkingDir>,
        run_log: Arc<RunLog>,
        dry_run: bool,
        notify_ops_on_missing: bool,
    ) -> Self {
        Self { distribution, notifier, store, workdir, run_log, dry_run, notify_ops_on_missing }
    }

    /// Dispatcher shared with the fleet runner for allow-list alerts.
    pub fn notifier(&self) -> &Arc<NotificationDispatcher> {
        &self.notifier
    }

    /// Execute the plan's actions in order.
    ///
    /// A provider-side delete failure is fatal for this principal: the
    /// error propagates and the replacement is never created.
    pub async fn execute(
        &self,
        provider: &dyn IdentityProvider,
        principal: &Principal,
        plan: &RotationPlan,
    ) -> Result<ExecutionReport> {
        let mut report = ExecutionReport::default();
        for action in &plan.actions {
            match action {
                RotationAction::Delete { key_id } => {
                    self.delete_key(provider, principal, key_id).await?;
                    report.deleted = Some(key_id.clone());
                }
                RotationAction::Create => {
                    let (created, outcome) = self.create_key(provider, principal, plan).await?;
                    report.created = created;
                    report.outcome = Some(outcome);
                }
            }
        }
        Ok(report)
    }

    async fn delete_key(
        &self,
        provider: &dyn IdentityProvider,
        principal: &Principal,
        key_id: &str,
    ) -> Result<()> {
        if self.dry_run {
            info!(principal = %principal, key_id, "dry run: provider delete suppressed");
        } else {
            provider.delete_key(principal, key_id).await?;
        }
        self.run_log.record(
            &principal.account,
            &principal.name,
            RunEventKind::KeyDeleted { key_id: key_id.to_string() },
        );

        let kind = self.notifier.key_deleted(principal, key_id).await;
        self.run_log.record(&principal.account, &principal.name, kind);

        // Retire the deleted key's artifacts. These cleanups are
        // non-fatal: the provider-side state is already correct.
        let name = plaintext_name(&principal.account, &principal.name, key_id);
        if let Err(err) = self.workdir.remove(&name).await {
            warn!(file = %name, error = %err, "working file cleanup failed");
        }
        for object in [name.clone(), ciphertext_name(&principal.account, &principal.name, key_id)]
        {
            if let Err(err) = self.store.delete(&object).await {
                warn!(object = %object, error = %err, "stored artifact cleanup failed");
                self.run_log.record(
                    &principal.account,
                    &principal.name,
                    RunEventKind::ArtifactCleanupFailed { name: object },
                );
            }
        }
        Ok(())
    }

    async fn create_key(
        &self,
        provider: &dyn IdentityProvider,
        principal: &Principal,
        plan: &RotationPlan,
    ) -> Result<(Option<KeyRecord>, DistributionOutcome)> {
        let issued = if self.dry_run {
            info!(principal = %principal, "dry run: provider create suppressed");
            IssuedKey::dry_run(&principal.account, &principal.name)
        } else {
            provider.create_key(principal).await?
        };
        self.run_log.record(
            &principal.account,
            &principal.name,
            RunEventKind::KeyCreated { key_id: issued.record.id.clone() },
        );

        let outcome = self.distribution.distribute(&issued, principal).await?;
        match &outcome {
            DistributionOutcome::Delivered { location } => {
                self.run_log.record(
                    &principal.account,
                    &principal.name,
                    RunEventKind::ArtifactStored { location: location.to_string() },
                );
                let notify_via =
                    plan.notify_via.clone().unwrap_or_else(|| issued.record.id.clone());
                let kind = self.notifier.key_created(principal, &notify_via, location).await;
                self.run_log.record(&principal.account, &principal.name, kind);
            }
            DistributionOutcome::MissingRecipientKey => {
                self.run_log.record(
                    &principal.account,
                    &principal.name,
                    RunEventKind::MissingRecipientKey,
                );
                if self.notify_ops_on_missing {
                    let kind = self
                        .notifier
                        .missing_info(principal, "missing a public key required for encryption")
                        .await;
                    self.run_log.record(&principal.account, &principal.name, kind);
                }
            }
        }

        let created = if self.dry_run { None } else { Some(issued.record.clone()) };
        Ok((created, outcome))
    }
}
