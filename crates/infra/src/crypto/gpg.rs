//! GPG subprocess encryption adapter
//!
//! Pipes the credential record through a local `gpg` binary, encrypting
//! for every recipient key id in one pass. The recipients' public keys
//! must already be imported on the rotation host.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use keyrotor_core::Encryptor;
use keyrotor_domain::{RecipientSpec, Result, RotationError};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Encryptor shelling out to `gpg`
pub struct GpgEncryptor {
    binary: PathBuf,
    timeout: Duration,
}

impl Default for GpgEncryptor {
    fn default() -> Self {
        Self { binary: PathBuf::from("gpg"), timeout: DEFAULT_TIMEOUT }
    }
}

impl GpgEncryptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific gpg binary instead of the one on `PATH`.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Abort encryption attempts that exceed the given duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Encryptor for GpgEncryptor {
    async fn encrypt(&self, plaintext: &[u8], recipients: &RecipientSpec) -> Result<Vec<u8>> {
        if recipients.is_empty() {
            return Err(RotationError::Distribution("no encryption recipients".to_string()));
        }

        let mut command = Command::new(&self.binary);
        command
            .arg("--batch")
            .arg("--yes")
            .arg("--trust-model")
            .arg("always")
            .arg("--encrypt")
            .arg("--output")
            .arg("-");
        for key_id in &recipients.key_ids {
            command.arg("--recipient").arg(key_id);
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|err| {
            RotationError::Distribution(format!(
                "failed to spawn {}: {}",
                self.binary.display(),
                err
            ))
        })?;
        let mut stdin = child.stdin.take().ok_or_else(|| {
            RotationError::Distribution("gpg stdin unavailable".to_string())
        })?;
        stdin.write_all(plaintext).await.map_err(|err| {
            RotationError::Distribution(format!("writing plaintext to gpg failed: {}", err))
        })?;
        drop(stdin);

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                RotationError::Distribution(format!(
                    "gpg timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|err| RotationError::Distribution(format!("gpg did not run: {}", err)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RotationError::Distribution(format!(
                "gpg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(RotationError::Distribution("gpg produced no ciphertext".to_string()));
        }
        Ok(output.stdout)
    }
}
