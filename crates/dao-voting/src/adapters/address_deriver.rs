//! BLAKE3 address deriver

use crate::domain::RecordSeeds;
use crate::ports::outbound::AddressDeriver;
use shared_crypto::derive_seeded_hash;
use shared_types::Address;

/// Derive-key context for record addresses.
pub const ADDRESS_CONTEXT: &str = "dao-voting record address v1";

/// Derives record addresses as
/// `BLAKE3-derive-key(context, program_id || seed count || len-prefixed seeds)`.
///
/// Deployments with different program ids never share addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3AddressDeriver {
    program_id: [u8; 32],
}

impl Blake3AddressDeriver {
    pub fn new(program_id: [u8; 32]) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> &[u8; 32] {
        &self.program_id
    }
}

impl AddressDeriver for Blake3AddressDeriver {
    fn derive_address(&self, seeds: &RecordSeeds) -> Address {
        Address::new(derive_seeded_hash(
            ADDRESS_CONTEXT,
            &self.program_id,
            &seeds.as_slices(),
        ))
    }
}
