//! Accounts and identity principals

use serde::{Deserialize, Serialize};

/// A cloud account that owns identity principals
///
/// Accounts exist independent of the rotation run and are read-only to
/// this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account name as it appears in the account registry.
    pub name: String,
    /// Role to assume when entering the account in fleet mode. `None`
    /// means the ambient credentials already reach the account.
    #[serde(default)]
    pub role_arn: Option<String>,
}

impl Account {
    /// Account reached with ambient credentials, no role assumption.
    pub fn ambient(name: impl Into<String>) -> Self {
        Self { name: name.into(), role_arn: None }
    }
}

/// An identity principal whose access keys are managed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub account: String,
    pub name: String,
}

impl Principal {
    pub fn new(account: impl Into<String>, name: impl Into<String>) -> Self {
        Self { account: account.into(), name: name.into() }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.account)
    }
}
