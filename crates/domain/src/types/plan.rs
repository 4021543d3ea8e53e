//! Rotation plans produced by the decision engine

use serde::{Deserialize, Serialize};

/// A single provider-side step of a rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationAction {
    /// Remove the given key. Always ordered before `Create` so a third
    /// live key can never outlast the point of failure.
    Delete { key_id: String },
    /// Mint the replacement key.
    Create,
}

/// Ordered Create/Delete actions derived from an inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPlan {
    pub actions: Vec<RotationAction>,
    /// Key id the rotation notice references: the key the principal is
    /// currently tracking, not the newly minted one.
    pub notify_via: Option<String>,
}

impl RotationPlan {
    /// Plan with no actions; the principal is out of scope for this run.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Key id scheduled for deletion, if the plan retires one.
    pub fn delete_target(&self) -> Option<&str> {
        self.actions.iter().find_map(|action| match action {
            RotationAction::Delete { key_id } => Some(key_id.as_str()),
            RotationAction::Create => None,
        })
    }

    /// Whether the plan mints a replacement key.
    pub fn creates_key(&self) -> bool {
        self.actions.iter().any(|action| matches!(action, RotationAction::Create))
    }
}
