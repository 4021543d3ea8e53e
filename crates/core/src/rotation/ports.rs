//! Port interfaces for identity-provider access
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use keyrotor_domain::{Inventory, IssuedKey, Principal, Result};

/// Trait for the identity provider holding principals and their keys
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// List every principal in the provider's account.
    async fn list_principals(&self) -> Result<Vec<Principal>>;

    /// Snapshot the principal's live keys in observation order.
    async fn list_keys(&self, principal: &Principal) -> Result<Inventory>;

    /// Mint a new key pair for the principal.
    async fn create_key(&self, principal: &Principal) -> Result<IssuedKey>;

    /// Remove the given key from the principal.
    async fn delete_key(&self, principal: &Principal, key_id: &str) -> Result<()>;
}
