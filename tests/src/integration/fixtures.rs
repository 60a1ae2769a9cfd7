//! Shared test harness
//!
//! One in-memory deployment: ledger store, token-balance oracle on a single
//! governance mint, manual clock and an event bus.

use dao_voting::adapters::{InMemoryLedgerStore, ManualClock, TokenBalanceOracle};
use dao_voting::{NewProposal, VotingConfig, VotingService};
use shared_bus::InMemoryEventBus;
use shared_types::{Address, Principal, Timestamp};
use std::sync::Arc;

/// Reference "now" for every scenario
pub const T0: Timestamp = 1_700_000_000;

/// Governance mint used by the oracle
pub const GOVERNANCE_MINT: Address = Address([0x4D; 32]);

pub type Service = VotingService<InMemoryLedgerStore, TokenBalanceOracle, ManualClock>;

/// A running in-memory deployment
pub struct Dao {
    pub service: Arc<Service>,
    pub store: Arc<InMemoryLedgerStore>,
    pub oracle: Arc<TokenBalanceOracle>,
    pub clock: Arc<ManualClock>,
    pub bus: Arc<InMemoryEventBus>,
}

impl Dao {
    pub fn new() -> Self {
        Self::with_config(VotingConfig::default())
    }

    pub fn with_config(config: VotingConfig) -> Self {
        dao_telemetry::init_test_tracing();

        let store = Arc::new(InMemoryLedgerStore::new());
        let oracle = Arc::new(TokenBalanceOracle::new(GOVERNANCE_MINT));
        let clock = Arc::new(ManualClock::new(T0));
        let bus = Arc::new(InMemoryEventBus::new());
        let service = VotingService::new(config, store.clone(), oracle.clone(), clock.clone())
            .with_publisher(bus.clone());

        Self {
            service: Arc::new(service),
            store,
            oracle,
            clock,
            bus,
        }
    }

    /// Register voter `index` holding `balance` governance tokens.
    ///
    /// Returns the voter principal and their credential account.
    pub fn voter(&self, index: u32, balance: u64) -> (Principal, Address) {
        let principal = principal(index);
        let account = token_account(index);
        self.oracle.mint_to(account, principal, balance);
        (principal, account)
    }
}

impl Default for Dao {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic principal for an index
pub fn principal(index: u32) -> Principal {
    let mut bytes = [0xA0u8; 32];
    bytes[..4].copy_from_slice(&index.to_le_bytes());
    Principal::new(bytes)
}

/// Deterministic token account for an index
pub fn token_account(index: u32) -> Address {
    let mut bytes = [0x70u8; 32];
    bytes[..4].copy_from_slice(&index.to_le_bytes());
    Address::new(bytes)
}

/// Proposal request with a window relative to `T0`
pub fn proposal_request(sequence_number: u64, start_offset: i64, end_offset: i64) -> NewProposal {
    NewProposal {
        sequence_number,
        description: format!("Proposal #{sequence_number}"),
        voting_start: T0 + start_offset,
        voting_end: T0 + end_offset,
    }
}
