//! # dao-voting
//!
//! Token-gated proposal voting with one vote per governance credential.
//!
//! ## Overview
//!
//! This crate provides:
//! - **Proposals**: create-only records at addresses derived from
//!   `(creator, sequence_number)`
//! - **Vote receipts**: create-only records at addresses derived from
//!   `(credential, proposal)`; an occupied address is what rejects a second vote
//! - **Time gating**: votes accepted for `voting_start <= now <= voting_end`
//! - **Finalization**: creator-only, after the window, with a non-empty proof
//!
//! ## Architecture
//!
//! ```text
//!   create_proposal / cast_vote / finalize_vote   (VotingApi)
//!                        │
//!                        ▼
//!                 ┌──────────────┐   publish after commit
//!                 │VotingService │ ─────────────────────→ shared-bus
//!                 └──────┬───────┘
//!                        │ per-proposal lock → clock → checks → atomic commit
//!      ┌────────────┬────┴───────┬──────────────┬───────────────┐
//!      ▼            ▼            ▼              ▼               ▼
//! LedgerStore  CredentialOracle Clock   AddressDeriver   ProofVerifier
//! ```
//!
//! ## Proposal Lifecycle
//!
//! ```text
//! [Pending] ──start──→ [Open] ──end──→ [AwaitingFinalization] ──finalize──→ [Finalized]
//!                        │
//!                        └── cast_vote (one per credential)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use dao_voting::{VotingService, VotingConfig, NewProposal};
//! use dao_voting::adapters::{InMemoryLedgerStore, SystemClock, TokenBalanceOracle};
//! use dao_voting::ports::inbound::VotingApi;
//!
//! let service = VotingService::new(
//!     VotingConfig::from_env(),
//!     Arc::new(InMemoryLedgerStore::new()),
//!     Arc::new(TokenBalanceOracle::new(governance_mint)),
//!     Arc::new(SystemClock),
//! );
//!
//! let proposal = service.create_proposal(creator, NewProposal { .. }).await?;
//! service.cast_vote(proposal, voter, voter_tokens, ballot).await?;
//! service.finalize_vote(proposal, creator, yes, no, proof).await?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
mod locks;
pub mod metrics;
pub mod ports;
pub mod service;

pub use config::VotingConfig;
pub use domain::{
    Proposal, ProposalOutcome, ProposalPhase, RecordKind, RecordSeeds, VoteReceipt, VotingWindow,
    MAX_DESCRIPTION_BYTES,
};
pub use error::{ErrorClass, StoreError, StoreResult, VotingError, VotingResult};
pub use ports::inbound::{FinalizeResult, NewProposal, VoteCastResult, VotingApi};
pub use ports::outbound::{
    AddressDeriver, Clock, CredentialOracle, LedgerStore, ProofVerifier, WriteOp,
};
pub use service::VotingService;
