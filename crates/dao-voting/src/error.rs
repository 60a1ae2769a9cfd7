//! Error types for the voting core

use shared_types::{Address, Principal, Timestamp};
use thiserror::Error;

/// How a caller should treat a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The same request may succeed once the clock advances.
    RetryLater,
    /// The request can never succeed against the current record.
    NeverValid,
    /// Infrastructure failure; resubmitting unchanged may succeed.
    Transient,
}

/// Voting core errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VotingError {
    /// A proposal record already occupies the derived address
    #[error("Proposal already exists at {address}")]
    AlreadyExists { address: Address },

    /// Principal may not perform the operation
    #[error("Principal {principal} is not authorized: {reason}")]
    Unauthorized {
        principal: Principal,
        reason: &'static str,
    },

    /// A receipt already exists for this (credential, proposal) pair
    #[error("Credential {credential} already voted on proposal {proposal}")]
    AlreadyVoted {
        credential: Address,
        proposal: Address,
    },

    /// Clock is before the voting window
    #[error("Voting starts at {starts_at}, now {now}")]
    VotingNotStarted { starts_at: Timestamp, now: Timestamp },

    /// Clock is past the voting window
    #[error("Voting ended at {ended_at}, now {now}")]
    VotingEnded { ended_at: Timestamp, now: Timestamp },

    /// Finalization attempted while the window is still open
    #[error("Voting period ends at {ends_at}, now {now}")]
    VotingPeriodNotEnded { ends_at: Timestamp, now: Timestamp },

    /// Proposal is in its terminal state
    #[error("Proposal {proposal} already finalized")]
    AlreadyFinalized { proposal: Address },

    /// Finalization proof missing or rejected
    #[error("Invalid proof: {reason}")]
    InvalidProof { reason: &'static str },

    /// No proposal record at the address
    #[error("Proposal not found: {address}")]
    ProposalNotFound { address: Address },

    /// Description exceeds the record bound
    #[error("Description is {len} bytes, max {max}")]
    DescriptionTooLong { len: usize, max: usize },

    /// Window starts after it ends
    #[error("Invalid voting window: start {start} > end {end}")]
    InvalidVotingWindow { start: Timestamp, end: Timestamp },

    /// Submitted tallies exceed the receipts allocated
    #[error("Tallies sum to {tallied}, only {cast} votes were cast")]
    TallyExceedsVotesCast { tallied: u128, cast: u64 },

    /// Counter arithmetic overflowed
    #[error("Arithmetic overflow in {field}")]
    Overflow { field: &'static str },

    /// Commit kept losing compare-and-swap races
    #[error("Gave up after {attempts} conflicting commit attempts")]
    Contention { attempts: u32 },

    /// Ledger store failure
    #[error("Storage error: {reason}")]
    Storage { reason: String },

    /// Record bytes could not be encoded or decoded
    #[error("Codec error: {reason}")]
    Codec { reason: String },

    /// Credential oracle failure
    #[error("Credential oracle error: {reason}")]
    Oracle { reason: String },
}

impl VotingError {
    /// Classify the error for caller retry policy.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::VotingNotStarted { .. } | Self::VotingPeriodNotEnded { .. } => {
                ErrorClass::RetryLater
            }
            Self::Contention { .. }
            | Self::Storage { .. }
            | Self::Codec { .. }
            | Self::Oracle { .. } => ErrorClass::Transient,
            Self::AlreadyExists { .. }
            | Self::Unauthorized { .. }
            | Self::AlreadyVoted { .. }
            | Self::VotingEnded { .. }
            | Self::AlreadyFinalized { .. }
            | Self::InvalidProof { .. }
            | Self::ProposalNotFound { .. }
            | Self::DescriptionTooLong { .. }
            | Self::InvalidVotingWindow { .. }
            | Self::TallyExceedsVotesCast { .. }
            | Self::Overflow { .. } => ErrorClass::NeverValid,
        }
    }

    /// Stable snake_case label, used for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "already_exists",
            Self::Unauthorized { .. } => "unauthorized",
            Self::AlreadyVoted { .. } => "already_voted",
            Self::VotingNotStarted { .. } => "voting_not_started",
            Self::VotingEnded { .. } => "voting_ended",
            Self::VotingPeriodNotEnded { .. } => "voting_period_not_ended",
            Self::AlreadyFinalized { .. } => "already_finalized",
            Self::InvalidProof { .. } => "invalid_proof",
            Self::ProposalNotFound { .. } => "proposal_not_found",
            Self::DescriptionTooLong { .. } => "description_too_long",
            Self::InvalidVotingWindow { .. } => "invalid_voting_window",
            Self::TallyExceedsVotesCast { .. } => "tally_exceeds_votes_cast",
            Self::Overflow { .. } => "overflow",
            Self::Contention { .. } => "contention",
            Self::Storage { .. } => "storage",
            Self::Codec { .. } => "codec",
            Self::Oracle { .. } => "oracle",
        }
    }
}

/// Result type for voting operations
pub type VotingResult<T> = Result<T, VotingError>;

/// Ledger store errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A create-only write hit an existing record
    #[error("Address {address} is already occupied")]
    AddressOccupied { address: Address },

    /// A compare-and-swap write saw different bytes than expected
    #[error("Record at {address} changed since it was read")]
    Conflict { address: Address },

    /// Backend failure
    #[error("Store backend failure: {reason}")]
    Backend { reason: String },
}

/// Result type for ledger store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for VotingError {
    fn from(err: StoreError) -> Self {
        // Occupied/Conflict are mapped by the service where their meaning is
        // known; reaching this conversion means the store misbehaved.
        VotingError::Storage {
            reason: err.to_string(),
        }
    }
}

impl From<bincode::Error> for VotingError {
    fn from(err: bincode::Error) -> Self {
        VotingError::Codec {
            reason: err.to_string(),
        }
    }
}
