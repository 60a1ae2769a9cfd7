//! Per-proposal serialization locks
//!
//! Operations on the same proposal address run one at a time; operations on
//! different proposals never wait on each other. Entries are dropped from the
//! registry once nobody holds or waits on them.

use crate::metrics;
use parking_lot::Mutex;
use shared_types::Address;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct ProposalLocks {
    locks: Mutex<HashMap<Address, Arc<AsyncMutex<()>>>>,
}

impl ProposalLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `address`.
    pub(crate) async fn acquire(&self, address: Address) -> ProposalLockGuard<'_> {
        let lock = match self.locks.lock().entry(address) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                metrics::record_lock_registered();
                entry.insert(Arc::default()).clone()
            }
        };

        let guard = lock.lock_owned().await;
        ProposalLockGuard {
            registry: self,
            address,
            guard: Some(guard),
        }
    }

    /// Live registry entries
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().len()
    }
}

pub(crate) struct ProposalLockGuard<'a> {
    registry: &'a ProposalLocks,
    address: Address,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ProposalLockGuard<'_> {
    fn drop(&mut self) {
        // Release before inspecting the count so our own Arc is gone
        drop(self.guard.take());

        let mut locks = self.registry.locks.lock();
        let idle = locks
            .get(&self.address)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.address);
            metrics::record_lock_evicted();
        }
    }
}
