//! Driving Ports (API - Inbound)

use crate::domain::{Proposal, ProposalOutcome, ProposalPhase, VoteReceipt};
use crate::error::VotingResult;
use async_trait::async_trait;
use shared_types::{Address, Principal, Timestamp};

/// Parameters of a new proposal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProposal {
    /// Creator-chosen, must be unique per creator
    pub sequence_number: u64,
    pub description: String,
    pub voting_start: Timestamp,
    pub voting_end: Timestamp,
}

/// Result of an accepted vote
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteCastResult {
    /// Address of the newly allocated receipt
    pub receipt: Address,
    /// Proposal counter after this vote
    pub total_votes_cast: u64,
}

/// Result of a successful finalization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinalizeResult {
    pub yes_votes: u64,
    pub no_votes: u64,
    pub total_votes_cast: u64,
    pub outcome: ProposalOutcome,
}

/// Primary Voting API
///
/// This is the driving port of the voting core. Each state-changing call is
/// one atomic transaction: it either commits every write or none.
#[async_trait]
pub trait VotingApi: Send + Sync {
    /// Allocate a proposal at the address derived from
    /// `(creator, sequence_number)`.
    ///
    /// # Errors
    /// * `AlreadyExists` - a record already occupies the address
    /// * `DescriptionTooLong` - description exceeds the configured bound
    /// * `InvalidVotingWindow` - start after end, when rejection is enabled
    async fn create_proposal(
        &self,
        creator: Principal,
        proposal: NewProposal,
    ) -> VotingResult<Address>;

    /// Cast one vote through a governance credential account.
    ///
    /// The ballot is stored unvalidated. Checks run in the order
    /// `ProposalNotFound`, `Unauthorized`, `VotingNotStarted`,
    /// `VotingEnded`, `AlreadyFinalized`, `AlreadyVoted`.
    async fn cast_vote(
        &self,
        proposal: Address,
        voter: Principal,
        credential: Address,
        encrypted_vote: Vec<u8>,
    ) -> VotingResult<VoteCastResult>;

    /// Record final tallies and close the proposal.
    ///
    /// Checks run in the order `ProposalNotFound`, `Unauthorized`,
    /// `AlreadyFinalized`, `VotingPeriodNotEnded`, `InvalidProof`,
    /// `TallyExceedsVotesCast`.
    async fn finalize_vote(
        &self,
        proposal: Address,
        finalizer: Principal,
        yes_votes: u64,
        no_votes: u64,
        proof: Vec<u8>,
    ) -> VotingResult<FinalizeResult>;

    /// Load a proposal, `None` if absent
    async fn get_proposal(&self, proposal: Address) -> VotingResult<Option<Proposal>>;

    /// Load the receipt for a (credential, proposal) pair
    async fn get_vote_receipt(
        &self,
        credential: Address,
        proposal: Address,
    ) -> VotingResult<Option<VoteReceipt>>;

    /// Whether a receipt exists for a (credential, proposal) pair
    async fn has_voted(&self, credential: Address, proposal: Address) -> VotingResult<bool>;

    /// Phase of a proposal against the current clock
    async fn phase(&self, proposal: Address) -> VotingResult<ProposalPhase>;

    /// Address a proposal by `(creator, sequence_number)` lives at
    fn proposal_address(&self, creator: &Principal, sequence_number: u64) -> Address;
}
