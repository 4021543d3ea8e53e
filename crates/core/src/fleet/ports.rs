//! Port interfaces for fleet enumeration and allow-listing
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use std::sync::Arc;

use async_trait::async_trait;
use keyrotor_domain::{Account, Principal, Result};

use crate::rotation::ports::IdentityProvider;

/// Trait for enumerating target accounts and entering them
#[async_trait]
pub trait Fleet: Send + Sync {
    /// Accounts this run operates on.
    async fn accounts(&self) -> Result<Vec<Account>>;

    /// Identity-provider handle scoped to the given account. In fleet
    /// mode this is where role assumption happens.
    async fn provider_for(&self, account: &Account) -> Result<Arc<dyn IdentityProvider>>;
}

/// Trait for the principal allow-list
#[async_trait]
pub trait AllowList: Send + Sync {
    /// Whether the principal is managed by this rotation run.
    async fn is_allowed(&self, principal: &Principal) -> Result<bool>;

    /// Whether the principal is explicitly excluded: skipped without the
    /// missing-information alert.
    async fn is_excluded(&self, principal: &Principal) -> Result<bool>;
}
