//! Proof verifier adapters

use crate::domain::Proposal;
use crate::ports::outbound::ProofVerifier;

/// Accepts any non-empty proof.
///
/// Tallying happens off-chain; this layer only checks that a proof was
/// supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonEmptyProofVerifier;

impl ProofVerifier for NonEmptyProofVerifier {
    fn verify(&self, _proposal: &Proposal, _yes_votes: u64, _no_votes: u64, proof: &[u8]) -> bool {
        !proof.is_empty()
    }
}
