//! Distribution artifacts: naming, locations, outcomes

use serde::{Deserialize, Serialize};

/// Name of the transient plaintext credential file:
/// `{account}-{principal}-{keyIdOrSentinel}.csv`.
pub fn plaintext_name(account: &str, principal: &str, key_id: &str) -> String {
    format!("{}-{}-{}.csv", account, principal, key_id)
}

/// Name of the encrypted artifact: the plaintext name plus `.gpg`.
pub fn ciphertext_name(account: &str, principal: &str, key_id: &str) -> String {
    format!("{}.gpg", plaintext_name(account, principal, key_id))
}

/// Location of an artifact in durable storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactLocation {
    pub bucket: String,
    pub key: String,
}

impl std::fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Encryption recipients resolved for one principal: the operator/team
/// keys plus the principal's registered public-key identities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientSpec {
    pub key_ids: Vec<String>,
}

impl RecipientSpec {
    pub fn new(key_ids: Vec<String>) -> Self {
        Self { key_ids }
    }

    pub fn is_empty(&self) -> bool {
        self.key_ids.is_empty()
    }
}

/// Result of distributing a newly issued key
///
/// `MissingRecipientKey` is an expected outcome, not an error: the
/// provider-side rotation already happened and is never rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionOutcome {
    /// Encrypted artifact uploaded; the location goes into the
    /// principal-facing notification.
    Delivered { location: ArtifactLocation },
    /// Recipient key material was absent, or encryption produced no
    /// output artifact.
    MissingRecipientKey,
}
