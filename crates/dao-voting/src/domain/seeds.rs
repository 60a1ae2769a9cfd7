//! Address derivation seeds
//!
//! | Record | Namespace | Owner | Disambiguator |
//! |--------|-----------|-------|---------------|
//! | Proposal | `proposal` | creator | sequence number, 8 bytes LE |
//! | Vote receipt | `vote_receipt` | credential account | proposal address |

use shared_types::{Address, Principal};

pub const PROPOSAL_NAMESPACE: &[u8] = b"proposal";
pub const VOTE_RECEIPT_NAMESPACE: &[u8] = b"vote_receipt";

/// Seed tuple fed to an address deriver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordSeeds {
    pub namespace: &'static [u8],
    pub owner: [u8; 32],
    disambiguator: [u8; 32],
    disambiguator_len: usize,
}

impl RecordSeeds {
    pub fn proposal(creator: &Principal, sequence_number: u64) -> Self {
        let mut disambiguator = [0u8; 32];
        disambiguator[..8].copy_from_slice(&sequence_number.to_le_bytes());
        Self {
            namespace: PROPOSAL_NAMESPACE,
            owner: creator.0,
            disambiguator,
            disambiguator_len: 8,
        }
    }

    pub fn vote_receipt(credential: &Address, proposal: &Address) -> Self {
        Self {
            namespace: VOTE_RECEIPT_NAMESPACE,
            owner: credential.0,
            disambiguator: proposal.0,
            disambiguator_len: 32,
        }
    }

    /// Disambiguator bytes actually used.
    pub fn disambiguator(&self) -> &[u8] {
        &self.disambiguator[..self.disambiguator_len]
    }

    /// All seeds in derivation order.
    pub fn as_slices(&self) -> [&[u8]; 3] {
        [self.namespace, &self.owner, self.disambiguator()]
    }
}
