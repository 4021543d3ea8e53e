//! Account registry backing the allow-list and recipient directory
//!
//! One JSON document drives fleet membership, the principal allow-list,
//! notification addresses, and encryption recipients. The registry can be
//! read from local disk or fetched from the artifact bucket.

use std::path::Path;

use async_trait::async_trait;
use keyrotor_core::{AllowList, RecipientDirectory};
use keyrotor_domain::{Account, Principal, RecipientSpec, Result, RotationError};
use serde::{Deserialize, Serialize};

/// Parsed account registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountRegistry {
    accounts: Vec<AccountEntry>,
    /// Principals skipped silently, without the operations alert.
    #[serde(default)]
    excluded: Vec<String>,
    /// Operator/team key ids included in every recipient spec.
    #[serde(default)]
    team_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountEntry {
    name: String,
    #[serde(default)]
    role_arn: Option<String>,
    #[serde(default)]
    principals: Vec<PrincipalEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PrincipalEntry {
    name: String,
    #[serde(default)]
    emails: Vec<String>,
    #[serde(default)]
    public_keys: Vec<String>,
}

impl AccountRegistry {
    /// Parse a registry from its JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|err| RotationError::Directory(format!("invalid account registry: {}", err)))
    }

    /// Load a registry from a local file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| {
            RotationError::Directory(format!(
                "cannot read account registry {}: {}",
                path.display(),
                err
            ))
        })?;
        Self::from_json(&bytes)
    }

    /// Accounts listed in the registry, for fleet enumeration.
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .map(|entry| Account { name: entry.name.clone(), role_arn: entry.role_arn.clone() })
            .collect()
    }

    fn entry(&self, principal: &Principal) -> Option<&PrincipalEntry> {
        self.accounts
            .iter()
            .find(|account| account.name == principal.account)?
            .principals
            .iter()
            .find(|entry| entry.name == principal.name)
    }
}

#[async_trait]
impl RecipientDirectory for AccountRegistry {
    async fn emails_for(&self, principal: &Principal) -> Result<Vec<String>> {
        Ok(self.entry(principal).map(|entry| entry.emails.clone()).unwrap_or_default())
    }

    async fn encryption_recipients_for(
        &self,
        principal: &Principal,
    ) -> Result<Option<RecipientSpec>> {
        let Some(entry) = self.entry(principal) else {
            return Ok(None);
        };
        if entry.public_keys.is_empty() {
            return Ok(None);
        }
        let mut key_ids = self.team_keys.clone();
        key_ids.extend(entry.public_keys.iter().cloned());
        Ok(Some(RecipientSpec::new(key_ids)))
    }
}

#[async_trait]
impl AllowList for AccountRegistry {
    async fn is_allowed(&self, principal: &Principal) -> Result<bool> {
        Ok(self.entry(principal).is_some())
    }

    async fn is_excluded(&self, principal: &Principal) -> Result<bool> {
        Ok(self.excluded.iter().any(|name| name == &principal.name))
    }
}
