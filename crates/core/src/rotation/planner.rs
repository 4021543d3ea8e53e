//! Rotation decision engine - pure decision logic
//!
//! Given a point-in-time inventory, derive the ordered action plan for one
//! principal. No I/O happens here; the same inventory always yields the
//! same plan.

use keyrotor_domain::constants::MAX_LIVE_KEYS;
use keyrotor_domain::{Inventory, Result, RotationAction, RotationError, RotationPlan};

/// Derive the rotation plan for a principal's inventory.
///
/// - 0 keys: empty plan. Provisioning a first key is not rotation's job.
/// - 1 key: create a replacement; the rotation notice references the
///   existing key, since that is the key the principal is tracking.
/// - 2 keys: delete the older, create a replacement; the notice references
///   the surviving younger key.
/// - 3+ keys: the upstream invariant is broken; refuse to guess which two
///   to keep.
///
/// Older means the earlier creation timestamp. On a timestamp tie the key
/// observed first in inventory order is treated as the older one, so the
/// decision stays deterministic under either input order.
pub fn plan_rotation(inventory: &Inventory) -> Result<RotationPlan> {
    match inventory.records() {
        [] => Ok(RotationPlan::empty()),
        [only] => Ok(RotationPlan {
            actions: vec![RotationAction::Create],
            notify_via: Some(only.id.clone()),
        }),
        [first, second] => {
            let (older, younger) = if second.created_at < first.created_at {
                (second, first)
            } else {
                (first, second)
            };
            Ok(RotationPlan {
                actions: vec![
                    RotationAction::Delete { key_id: older.id.clone() },
                    RotationAction::Create,
                ],
                notify_via: Some(younger.id.clone()),
            })
        }
        more => Err(RotationError::InventoryInvariant(format!(
            "expected at most {} live keys, observed {}",
            MAX_LIVE_KEYS,
            more.len()
        ))),
    }
}
