//! Scratch directory for transient credential files
//!
//! Plaintext and freshly encrypted credential files live here for the
//! duration of a run only. The sweep runs unconditionally at run end and
//! removes every `.csv`/`.gpg` file it finds, whatever principal it
//! belonged to.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use keyrotor_core::WorkingDir;
use keyrotor_domain::{Result, RotationError};
use tracing::debug;

/// Working directory rooted at a configurable path
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl WorkingDir for ScratchDir {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|err| {
            RotationError::Storage(format!(
                "cannot create working dir {}: {}",
                self.root.display(),
                err
            ))
        })?;
        let path = self.root.join(name);
        tokio::fs::write(&path, bytes).await.map_err(|err| {
            RotationError::Storage(format!("cannot write {}: {}", path.display(), err))
        })?;
        Ok(path.display().to_string())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let path = self.root.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(RotationError::Storage(format!(
                "cannot remove {}: {}",
                path.display(),
                err
            ))),
        }
    }

    async fn sweep(&self) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(RotationError::Storage(format!(
                    "cannot read working dir {}: {}",
                    self.root.display(),
                    err
                )))
            }
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await.map_err(|err| {
            RotationError::Storage(format!("working dir listing failed: {}", err))
        })? {
            let path = entry.path();
            let transient = path
                .extension()
                .and_then(|extension| extension.to_str())
                .map(|extension| extension == "csv" || extension == "gpg")
                .unwrap_or(false);
            if !transient {
                continue;
            }
            tokio::fs::remove_file(&path).await.map_err(|err| {
                RotationError::Storage(format!("cannot remove {}: {}", path.display(), err))
            })?;
            debug!(file = %path.display(), "transient credential file removed");
            removed += 1;
        }
        Ok(removed)
    }
}
