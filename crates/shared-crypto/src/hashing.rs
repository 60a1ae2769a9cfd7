//! # Seeded BLAKE3 Derivation
//!
//! Turns `(program_id, seed list)` into a 32-byte address. Hashing runs in
//! BLAKE3 derive-key mode under a caller-chosen context string.
//!
//! ```text
//! derive_key(context) ← program_id ‖ u64le(n) ‖ (u64le(len) ‖ seed) × n
//! ```

use blake3::Hasher;
use shared_types::Hash;

/// Derive-key hasher that frames every seed with its length.
struct SeededHasher {
    inner: Hasher,
}

impl SeededHasher {
    fn new(context: &str, program_id: &[u8; 32], seed_count: usize) -> Self {
        let mut inner = Hasher::new_derive_key(context);
        inner.update(program_id);
        inner.update(&(seed_count as u64).to_le_bytes());
        Self { inner }
    }

    fn seed(&mut self, seed: &[u8]) {
        self.inner.update(&(seed.len() as u64).to_le_bytes());
        self.inner.update(seed);
    }

    fn finalize(&self) -> Hash {
        *self.inner.finalize().as_bytes()
    }
}

/// Derive a deterministic hash from a context, a program id and a seed list.
///
/// `["ab", "c"]` and `["a", "bc"]` derive different hashes.
pub fn derive_seeded_hash(context: &str, program_id: &[u8; 32], seeds: &[&[u8]]) -> Hash {
    let mut hasher = SeededHasher::new(context, program_id, seeds.len());
    for seed in seeds {
        hasher.seed(seed);
    }
    hasher.finalize()
}
