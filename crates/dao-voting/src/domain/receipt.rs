//! Vote receipt entity
//!
//! Exactly one receipt may exist per (credential, proposal). Its address is
//! derived from that pair and allocated create-only, which is what rejects a
//! second vote.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Principal, Timestamp};

/// Proof that a credential voted on a proposal.
///
/// Field order is the persisted layout order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// Proposal voted on
    pub proposal: Address,
    /// Governance credential account the vote was cast through
    pub credential: Address,
    /// Principal that authorized and paid for the vote
    pub voter: Principal,
    /// Opaque ballot, stored as submitted
    pub encrypted_vote: Vec<u8>,
    /// Clock reading when the vote committed
    pub cast_at: Timestamp,
}

impl VoteReceipt {
    pub fn new(
        proposal: Address,
        credential: Address,
        voter: Principal,
        encrypted_vote: Vec<u8>,
        cast_at: Timestamp,
    ) -> Self {
        Self {
            proposal,
            credential,
            voter,
            encrypted_vote,
            cast_at,
        }
    }
}
