//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for KeyRotor
///
/// Failures are contained at the principal boundary: the fleet runner
/// records the error for the affected principal and continues with the
/// rest of the run. Allow-list rejections and missing recipient keys are
/// routed notification paths, not errors, and do not appear here.
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RotationError {
    /// More live keys observed than the rotation model allows.
    #[error("Inventory invariant violated: {0}")]
    InventoryInvariant(String),

    /// Identity-provider call (list/create/delete) failed.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Durable storage call failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Encryption or working-file handling failed with recipients present.
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// Outbound notification transport failed.
    #[error("Notification error: {0}")]
    Notification(String),

    /// Account registry lookup or parse failed.
    #[error("Directory error: {0}")]
    Directory(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for KeyRotor operations
pub type Result<T> = std::result::Result<T, RotationError>;
