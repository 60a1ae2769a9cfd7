//! In-memory ledger store

use crate::error::{StoreError, StoreResult};
use crate::ports::outbound::{LedgerStore, WriteOp};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::Address;
use std::collections::HashMap;
use tracing::debug;

/// Ledger store backed by a `HashMap` under a single `RwLock`.
///
/// A commit validates every write under the write lock before applying any,
/// which makes each batch linearizable.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    records: RwLock<HashMap<Address, Vec<u8>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.records.read().contains_key(address)
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self, address: &Address) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.records.read().get(address).cloned())
    }

    async fn commit(&self, writes: Vec<WriteOp>) -> StoreResult<()> {
        let mut records = self.records.write();

        for (i, write) in writes.iter().enumerate() {
            let address = write.address();
            if writes[..i].iter().any(|w| w.address() == address) {
                return Err(StoreError::Backend {
                    reason: format!("address {address} written twice in one batch"),
                });
            }
            match write {
                WriteOp::Create { .. } => {
                    if records.contains_key(&address) {
                        return Err(StoreError::AddressOccupied { address });
                    }
                }
                WriteOp::CompareAndSwap { expected, .. } => {
                    if records.get(&address) != Some(expected) {
                        return Err(StoreError::Conflict { address });
                    }
                }
            }
        }

        let count = writes.len();
        for write in writes {
            match write {
                WriteOp::Create { address, data }
                | WriteOp::CompareAndSwap { address, data, .. } => {
                    records.insert(address, data);
                }
            }
        }

        debug!(writes = count, records = records.len(), "Batch committed");
        Ok(())
    }
}
