//! Secure distribution pipeline - core business logic
//!
//! Packages a newly issued credential into an encrypted artifact and
//! places it in durable storage. Missing recipient key material is an
//! expected outcome here, not a failure: the provider-side rotation has
//! already happened and is never rolled back.

use std::sync::Arc;

use keyrotor_domain::constants::CREDENTIAL_CSV_HEADER;
use keyrotor_domain::{
    ciphertext_name, plaintext_name, DistributionOutcome, IssuedKey, Principal, Result,
};
use tracing::{info, warn};

use super::ports::{Encryptor, ObjectStore, RecipientDirectory, WorkingDir};

/// Distribution pipeline for newly issued keys
pub struct DistributionPipeline {
    store: Arc<dyn ObjectStore>,
    encryptor: Arc<dyn Encryptor>,
    directory: Arc<dyn RecipientDirectory>,
    workdir: Arc<dyn WorkingDir>,
}

impl DistributionPipeline {
    /// Create a new distribution pipeline
    pub fn new(
        store: Arc<dyn ObjectStore>,
        encryptor: Arc<dyn Encryptor>,
        directory: Arc<dyn RecipientDirectory>,
        workdir: Arc<dyn WorkingDir>,
    ) -> Self {
        Self { store, encryptor, directory, workdir }
    }

    /// Package the issued key and place the encrypted artifact in storage.
    ///
    /// The plaintext working copy written here is strictly transient; the
    /// fleet runner sweeps it unconditionally at run end.
    pub async fn distribute(
        &self,
        key: &IssuedKey,
        principal: &Principal,
    ) -> Result<DistributionOutcome> {
        let record = &key.record;
        let name = plaintext_name(&record.account, &record.principal, &record.id);
        let body = render_credential_csv(key);

        let path = self.workdir.write(&name, body.as_bytes()).await?;
        info!(file = %path, principal = %principal, "credential working file created");

        let Some(recipients) = self.directory.encryption_recipients_for(principal).await? else {
            warn!(principal = %principal, "no encryption recipients registered");
            return Ok(DistributionOutcome::MissingRecipientKey);
        };
        if recipients.is_empty() {
            warn!(principal = %principal, "encryption recipient list is empty");
            return Ok(DistributionOutcome::MissingRecipientKey);
        }

        let ciphertext = match self.encryptor.encrypt(body.as_bytes(), &recipients).await {
            Ok(bytes) => bytes,
            Err(err) => {
                // No output artifact was produced, so this degrades the
                // same way as absent key material; operations get alerted
                // by the caller either way.
                warn!(error = %err, principal = %principal, "encryption produced no artifact");
                return Ok(DistributionOutcome::MissingRecipientKey);
            }
        };

        let object_key = ciphertext_name(&record.account, &record.principal, &record.id);
        let location = self.store.put(&object_key, ciphertext).await?;
        info!(location = %location, principal = %principal, "encrypted credential artifact stored");

        Ok(DistributionOutcome::Delivered { location })
    }
}

/// Render the credential as the two-line CSV record.
///
/// A sentinel key carries no secret; its rehearsal artifact is header-only.
fn render_credential_csv(key: &IssuedKey) -> String {
    if key.secret.is_empty() {
        return format!("{}\n", CREDENTIAL_CSV_HEADER);
    }
    let record = &key.record;
    format!(
        "{}\n{},{},{},{},{}\n",
        CREDENTIAL_CSV_HEADER,
        record.account,
        record.principal,
        record.id,
        key.secret,
        record.created_at
    )
}
