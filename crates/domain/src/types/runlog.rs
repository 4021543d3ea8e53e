//! Run log events
//!
//! Append-only record of every decision and action taken in a run, owned
//! by the fleet runner and optionally uploaded at run end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decision or action recorded during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunEvent {
    pub at: DateTime<Utc>,
    pub account: String,
    pub principal: String,
    pub kind: RunEventKind,
}

impl RunEvent {
    pub fn now(account: &str, principal: &str, kind: RunEventKind) -> Self {
        Self { at: Utc::now(), account: account.to_string(), principal: principal.to_string(), kind }
    }

    /// Render the event as one run-log line.
    pub fn render(&self) -> String {
        format!(
            "{} : {} : {} : {}",
            self.at.format("%m/%d/%Y %I:%M:%S %p"),
            self.account,
            self.principal,
            self.kind
        )
    }
}

/// What happened for one principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Inventory snapshot taken; `keys` live keys observed.
    InventoryChecked { keys: usize },
    /// No action planned (zero keys).
    NoAction,
    /// Replacement key minted.
    KeyCreated { key_id: String },
    /// Expired key removed from the provider.
    KeyDeleted { key_id: String },
    /// Encrypted artifact placed in durable storage.
    ArtifactStored { location: String },
    /// Storage-side artifact cleanup did not complete (non-fatal).
    ArtifactCleanupFailed { name: String },
    /// Notification handed to the transport.
    NotificationSent { subject: String },
    /// Notification transport failed (non-fatal).
    NotificationFailed { detail: String },
    /// Distribution could not complete for want of recipient key material.
    MissingRecipientKey,
    /// Principal failed the allow-list filter.
    AllowListRejected,
    /// Fatal per-principal failure; the run continued for others.
    PrincipalFailed { error: String },
}

impl std::fmt::Display for RunEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InventoryChecked { keys } => write!(f, "CHECKED ACCESS IDS ({} key(s))", keys),
            Self::NoAction => write!(f, "NO ACTION (0 keys)"),
            Self::KeyCreated { key_id } => write!(f, "KEY CREATION CONFIRMATION: {}", key_id),
            Self::KeyDeleted { key_id } => write!(f, "DELETION CONFIRMATION: {}", key_id),
            Self::ArtifactStored { location } => write!(f, "ACCESS ID PLACEMENT: {}", location),
            Self::ArtifactCleanupFailed { name } => {
                write!(f, "ARTIFACT CLEANUP FAILED: {}", name)
            }
            Self::NotificationSent { subject } => write!(f, "NOTIFICATION SENT: {}", subject),
            Self::NotificationFailed { detail } => write!(f, "NOTIFICATION FAILED: {}", detail),
            Self::MissingRecipientKey => write!(f, "MISSING A PUBLIC KEY REQUIRED FOR ENCRYPTION"),
            Self::AllowListRejected => write!(f, "NOT IN ACCOUNT LIST"),
            Self::PrincipalFailed { error } => write!(f, "ROTATION FAILED: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_account_principal_and_kind() {
        let event = RunEvent::now("prod", "deploy-bot", RunEventKind::NoAction);
        let line = event.render();
        assert!(line.contains("prod"));
        assert!(line.contains("deploy-bot"));
        assert!(line.contains("NO ACTION"));
    }
}
