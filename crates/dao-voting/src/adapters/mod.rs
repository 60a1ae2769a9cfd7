//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process implementations of the outbound ports.

mod address_deriver;
mod clock;
mod credential;
mod memory_store;
mod proof_verifier;

pub use address_deriver::{Blake3AddressDeriver, ADDRESS_CONTEXT};
pub use clock::{ManualClock, SystemClock};
pub use credential::{AllowListOracle, CredentialAccount, TokenBalanceOracle};
pub use memory_store::InMemoryLedgerStore;
pub use proof_verifier::NonEmptyProofVerifier;
