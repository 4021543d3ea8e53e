//! Port interfaces for secure distribution
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use keyrotor_domain::{ArtifactLocation, Principal, RecipientSpec, Result};

/// Trait for durable object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object, returning where it landed.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<ArtifactLocation>;

    /// Fetch an object's contents.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Remove an object. Removing a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Trait for encrypting credential records for a set of recipients
#[async_trait]
pub trait Encryptor: Send + Sync {
    /// Encrypt `plaintext` for every recipient in the spec. Producing no
    /// ciphertext is an error; the caller decides whether that degrades to
    /// a missing-recipient outcome.
    async fn encrypt(&self, plaintext: &[u8], recipients: &RecipientSpec) -> Result<Vec<u8>>;
}

/// Trait for resolving a principal's notification and encryption identities
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    /// Registered notification addresses for the principal.
    async fn emails_for(&self, principal: &Principal) -> Result<Vec<String>>;

    /// Encryption recipients for the principal (team keys plus the
    /// principal's registered public-key material), or `None` when the
    /// principal has none registered.
    async fn encryption_recipients_for(
        &self,
        principal: &Principal,
    ) -> Result<Option<RecipientSpec>>;
}

/// Trait for the transient working directory holding plaintext artifacts
#[async_trait]
pub trait WorkingDir: Send + Sync {
    /// Write a scratch file, returning its path for logging.
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<String>;

    /// Remove a scratch file if present.
    async fn remove(&self, name: &str) -> Result<()>;

    /// Remove every transient credential file, returning how many went.
    async fn sweep(&self) -> Result<usize>;
}
