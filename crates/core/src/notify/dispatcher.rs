//! Notification dispatcher - best-effort messaging
//!
//! Resolves recipients per message kind and hands the message to the
//! transport. A transport failure is logged and surfaced as a run-log
//! event; it never aborts the run.

use std::sync::Arc;

use keyrotor_domain::constants::RETIREMENT_NOTICE_DAYS;
use keyrotor_domain::{ArtifactLocation, Principal, RunEventKind};
use tracing::warn;

use crate::distribution::ports::RecipientDirectory;
use super::ports::Transport;

const SUBJECT_CREATED: &str = "TEAM MESSAGE: KEY ROTATION NOTIFICATION";
const SUBJECT_DELETED: &str = "TEAM MESSAGE: KEY DELETION NOTIFICATION";
const SUBJECT_MISSING: &str = "TEAM MESSAGE: MISSING INFORMATION FOR IAM USER";

/// Dispatcher for the three rotation message kinds
pub struct NotificationDispatcher {
    transport: Arc<dyn Transport>,
    directory: Arc<dyn RecipientDirectory>,
    ops_address: String,
}

impl NotificationDispatcher {
    /// Create a new dispatcher
    pub fn new(
        transport: Arc<dyn Transport>,
        directory: Arc<dyn RecipientDirectory>,
        ops_address: impl Into<String>,
    ) -> Self {
        Self { transport, directory, ops_address: ops_address.into() }
    }

    /// Notify the principal that a replacement key exists and which key is
    /// now scheduled to retire.
    ///
    /// `notify_via` is the key the principal is currently tracking, not
    /// the newly minted one.
    pub async fn key_created(
        &self,
        principal: &Principal,
        notify_via: &str,
        location: &ArtifactLocation,
    ) -> RunEventKind {
        let body = format!(
            "This is an access-key expiration notification for the following key pair:\n\n\
             Access ID: {}\nUser: {}\nAccount: {}\n\n\
             This key pair will be deleted in {} days.\n\n\
             Your new encrypted key pair can be found here: {}\n\n\
             Please make the necessary changes to prevent any downtime.\n",
            notify_via, principal.name, principal.account, RETIREMENT_NOTICE_DAYS, location
        );
        self.to_principal(principal, SUBJECT_CREATED, &body).await
    }

    /// Notify the principal that a specific key was deleted.
    pub async fn key_deleted(&self, principal: &Principal, key_id: &str) -> RunEventKind {
        let body = format!(
            "This is an access-key deletion notification for the following key pair:\n\n\
             Access ID: {}\nUser: {}\nAccount: {}\n\n\
             This key pair has been deleted.\n",
            key_id, principal.name, principal.account
        );
        self.to_principal(principal, SUBJECT_DELETED, &body).await
    }

    /// Alert operations that a principal is missing required information
    /// (absent from the account list, or lacking encryption key material).
    pub async fn missing_info(&self, principal: &Principal, reason: &str) -> RunEventKind {
        let body = format!(
            "The following user is missing information required for key rotation:\n\n\
             User: {}\nAccount: {}\nReason: {}\n\n\
             Ensure the user is listed in the account registry and their \
             public key material is imported on the rotation host.\n",
            principal.name, principal.account, reason
        );
        let recipients = vec![self.ops_address.clone()];
        self.dispatch(&recipients, SUBJECT_MISSING, &body).await
    }

    async fn to_principal(
        &self,
        principal: &Principal,
        subject: &str,
        body: &str,
    ) -> RunEventKind {
        let recipients = match self.directory.emails_for(principal).await {
            Ok(recipients) if !recipients.is_empty() => recipients,
            Ok(_) => {
                warn!(principal = %principal, "no registered notification addresses");
                return RunEventKind::NotificationFailed {
                    detail: "no registered notification addresses".to_string(),
                };
            }
            Err(err) => {
                warn!(principal = %principal, error = %err, "recipient lookup failed");
                return RunEventKind::NotificationFailed { detail: err.to_string() };
            }
        };
        self.dispatch(&recipients, subject, body).await
    }

    async fn dispatch(&self, recipients: &[String], subject: &str, body: &str) -> RunEventKind {
        match self.transport.send(recipients, subject, body).await {
            Ok(()) => RunEventKind::NotificationSent { subject: subject.to_string() },
            Err(err) => {
                warn!(subject, error = %err, "notification transport failed");
                RunEventKind::NotificationFailed { detail: err.to_string() }
            }
        }
    }
}
