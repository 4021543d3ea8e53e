//! Runtime configuration structures
//!
//! One immutable [`Config`] is built by the binary and threaded down
//! through the fleet runner. Nothing in here is a process-wide default.

use serde::{Deserialize, Serialize};

/// Configuration for a rotation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Execution-mode switches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Suppress provider create/delete calls while still exercising the
    /// logging, file-writing, distribution, and notification paths.
    pub dry_run: bool,
    /// Echo log output to stdout in addition to the log file.
    pub console_echo: bool,
    /// Rotate every registry account via role assumption instead of the
    /// single ambient-credential account.
    pub fleet: bool,
    /// Account name used in single-account mode.
    pub account: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        // Destructive operations stay off until explicitly enabled.
        Self { dry_run: true, console_echo: true, fleet: false, account: String::new() }
    }
}

/// Durable storage and scratch-space settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket holding encrypted key artifacts, the account registry, and
    /// uploaded run logs.
    pub bucket: String,
    /// Fetch the account registry from the bucket instead of local disk.
    pub registry_from_bucket: bool,
    /// Upload the run log to the bucket at end of run.
    pub upload_logs: bool,
    /// Local account registry path.
    pub registry_path: String,
    /// Scratch directory for transient plaintext/encrypted files.
    pub working_dir: String,
    /// Directory receiving the rotation log file.
    pub log_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            registry_from_bucket: false,
            upload_logs: false,
            registry_path: crate::constants::REGISTRY_OBJECT_KEY.to_string(),
            working_dir: ".".to_string(),
            log_dir: ".".to_string(),
        }
    }
}

/// Notification routing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Operations address receiving missing-information alerts.
    pub ops_address: String,
    /// From address for outbound notifications.
    pub sender: String,
    /// Alert operations about principals failing the allow-list or missing
    /// encryption key material.
    pub notify_ops_on_missing: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            ops_address: String::new(),
            sender: "noreply@localhost".to_string(),
            notify_ops_on_missing: true,
        }
    }
}
