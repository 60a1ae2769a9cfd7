//! Driven Ports (SPI - Outbound Dependencies)

use crate::domain::{Proposal, RecordSeeds};
use crate::error::{StoreResult, VotingResult};
use async_trait::async_trait;
use shared_types::{Address, Principal, Timestamp};

/// A single write inside an atomic commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    /// Allocate a record; fails with `AddressOccupied` if one exists
    Create { address: Address, data: Vec<u8> },
    /// Replace a record; fails with `Conflict` unless the stored bytes equal
    /// `expected`
    CompareAndSwap {
        address: Address,
        expected: Vec<u8>,
        data: Vec<u8>,
    },
}

impl WriteOp {
    pub fn address(&self) -> Address {
        match self {
            Self::Create { address, .. } | Self::CompareAndSwap { address, .. } => *address,
        }
    }
}

/// Record storage
///
/// `commit` is the linearization point: every write in the batch applies or
/// none does.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load the raw record at an address
    async fn load(&self, address: &Address) -> StoreResult<Option<Vec<u8>>>;

    /// Apply a batch of writes atomically
    async fn commit(&self, writes: Vec<WriteOp>) -> StoreResult<()>;
}

/// Governance credential check
///
/// Answers whether `owner` controls `credential` and that account is
/// non-empty/valid.
#[async_trait]
pub trait CredentialOracle: Send + Sync {
    async fn holds_valid_credential(
        &self,
        owner: &Principal,
        credential: &Address,
    ) -> VotingResult<bool>;
}

/// Trusted time source
pub trait Clock: Send + Sync {
    /// Current unix time in seconds
    fn now(&self) -> Timestamp;
}

/// Deterministic record addressing
///
/// Distinct seeds must map to distinct addresses.
pub trait AddressDeriver: Send + Sync {
    fn derive_address(&self, seeds: &RecordSeeds) -> Address;
}

/// Finalization proof check
///
/// Runs only for non-empty proofs; an empty proof is rejected before the
/// verifier is consulted.
pub trait ProofVerifier: Send + Sync {
    fn verify(
        &self,
        proposal: &Proposal,
        yes_votes: u64,
        no_votes: u64,
        proof: &[u8],
    ) -> bool;
}
