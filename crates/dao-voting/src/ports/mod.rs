//! Ports module for the voting core

pub mod inbound;
pub mod outbound;

pub use inbound::{FinalizeResult, NewProposal, VoteCastResult, VotingApi};
pub use outbound::{AddressDeriver, Clock, CredentialOracle, LedgerStore, ProofVerifier, WriteOp};
