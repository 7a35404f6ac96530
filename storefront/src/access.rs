//! Ownership capability check.
//!
//! Owner-restricted mutation — comment edit/delete, cart-item mutation,
//! order reads — all reduce to the same rule: the requester must be the
//! resource's owner. The rule lives here as one explicit guard rather than
//! being re-derived in each service.

use crate::errors::PermissionDenied;
use crate::types::UserId;

/// Fails with [`PermissionDenied`] unless `requester` owns the resource.
pub fn require_owner(requester: UserId, owner: UserId) -> Result<(), PermissionDenied> {
    if requester == owner {
        Ok(())
    } else {
        Err(PermissionDenied { requester, owner })
    }
}
