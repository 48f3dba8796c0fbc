//! Per-owner mutation lock registry.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use vault_core::types::OwnerId;

/// Registry mapping each owner to a mutation lock, created lazily and
/// never removed. Bounded by the number of distinct owners.
///
/// Mutations that touch the sibling-uniqueness or cycle invariants hold
/// the owner's lock for the full check + mutate span, so concurrent
/// requests from the same owner can never interleave an invariant check
/// with another request's mutation. Different owners share no state and
/// proceed in parallel.
#[derive(Debug, Default)]
pub struct OwnerLocks {
    locks: DashMap<OwnerId, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    /// Create an empty lock registry.
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get (or lazily create) the mutation lock for an owner.
    pub fn for_owner(&self, owner_id: OwnerId) -> Arc<Mutex<()>> {
        self.locks
            .entry(owner_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of owners with a registered lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no owner has mutated yet.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
