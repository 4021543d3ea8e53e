//! Access-key records and inventories

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An issued access-key identifier plus its creation time
///
/// Immutable once issued by the provider; created on issuance, destroyed
/// on deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Opaque provider-assigned key identifier.
    pub id: String,
    /// Owning account name.
    pub account: String,
    /// Owning principal name.
    pub principal: String,
    /// Creation timestamp reported by the provider (UTC).
    pub created_at: DateTime<Utc>,
}

/// Point-in-time snapshot of a principal's live keys
///
/// Taken at decision time and never cached across invocations. A
/// well-formed inventory holds at most two records; larger inventories are
/// rejected by the decision engine rather than modeled here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    records: Vec<KeyRecord>,
}

impl Inventory {
    /// Snapshot the given records in provider observation order.
    pub fn new(records: Vec<KeyRecord>) -> Self {
        Self { records }
    }

    /// Records in observation order.
    pub fn records(&self) -> &[KeyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A freshly minted key pair, including its secret material
///
/// The secret only ever travels into the distribution pipeline; `Debug`
/// redacts it.
#[derive(Clone)]
pub struct IssuedKey {
    pub record: KeyRecord,
    pub secret: String,
}

impl IssuedKey {
    /// Placeholder issued key used when provider mutations are suppressed.
    pub fn dry_run(account: impl Into<String>, principal: impl Into<String>) -> Self {
        Self {
            record: KeyRecord {
                id: crate::constants::DRY_RUN_KEY_SENTINEL.to_string(),
                account: account.into(),
                principal: principal.into(),
                created_at: Utc::now(),
            },
            secret: String::new(),
        }
    }
}

impl std::fmt::Debug for IssuedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedKey")
            .field("record", &self.record)
            .field("secret", &"<redacted>")
            .finish()
    }
}
