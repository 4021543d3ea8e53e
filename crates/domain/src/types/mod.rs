//! Common data types used throughout the application

pub mod artifact;
pub mod keys;
pub mod plan;
pub mod principal;
pub mod runlog;

pub use artifact::{
    ciphertext_name, plaintext_name, ArtifactLocation, DistributionOutcome, RecipientSpec,
};
pub use keys::{Inventory, IssuedKey, KeyRecord};
pub use plan::{RotationAction, RotationPlan};
pub use principal::{Account, Principal};
pub use runlog::{RunEvent, RunEventKind};
