//! # Domain Invariants
//!
//! Pure predicates over record state. Callers turn a `false` into the
//! matching [`RecordError`](super::RecordError).

use super::value_objects::{IdentityId, RecordStatus, TransitionPolicy};

/// Whether a validator may move a record from `from` to `to`.
///
/// The target must always be terminal. Under [`TransitionPolicy::Strict`]
/// the source must also be `Pending`, so terminal states stay final.
pub fn invariant_status_transition(
    policy: TransitionPolicy,
    from: RecordStatus,
    to: RecordStatus,
) -> bool {
    if !to.is_terminal() {
        return false;
    }
    match policy {
        TransitionPolicy::Strict => from == RecordStatus::Pending,
        TransitionPolicy::Permissive => true,
    }
}

/// The record owner is the invoking identity.
pub fn invariant_owner_matches(owner: &IdentityId, caller: &IdentityId) -> bool {
    owner == caller
}

/// Only approved records are returned by queries.
pub fn invariant_visible(status: RecordStatus) -> bool {
    status == RecordStatus::Approved
}
