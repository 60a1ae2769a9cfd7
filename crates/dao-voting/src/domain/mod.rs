//! Domain module for the voting core
//!
//! ## Core Modules
//! - proposal: Proposal record, voting window, lifecycle checks
//! - receipt: One-per-credential vote receipts
//! - seeds: Address derivation seeds for both record kinds
//! - codec: Versioned binary record layout

pub mod codec;
pub mod proposal;
pub mod receipt;
pub mod seeds;

pub use codec::{decode, encode, Record, RecordKind, LAYOUT_VERSION};
pub use proposal::{
    Proposal, ProposalOutcome, ProposalPhase, VotingWindow, MAX_DESCRIPTION_BYTES,
};
pub use receipt::VoteReceipt;
pub use seeds::{RecordSeeds, PROPOSAL_NAMESPACE, VOTE_RECEIPT_NAMESPACE};
