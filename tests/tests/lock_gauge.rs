//! Lock gauge accounting across service instances
//!
//! Kept in its own test binary: the gauge is process-global, so no other test
//! may move it while this one runs.

use async_trait::async_trait;
use dao_telemetry::{register_metrics, PROPOSAL_LOCKS};
use dao_voting::adapters::{InMemoryLedgerStore, ManualClock};
use dao_voting::{CredentialOracle, VotingApi, VotingConfig, VotingError, VotingResult, VotingService};
use dao_voting_tests::integration::fixtures::{principal, proposal_request, token_account, T0};
use shared_types::{Address, Principal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Oracle that parks every check until a permit is released
struct GatedOracle {
    gate: Semaphore,
}

#[async_trait]
impl CredentialOracle for GatedOracle {
    async fn holds_valid_credential(
        &self,
        _owner: &Principal,
        _credential: &Address,
    ) -> VotingResult<bool> {
        let _permit = self.gate.acquire().await.map_err(|e| VotingError::Oracle {
            reason: e.to_string(),
        })?;
        Ok(true)
    }
}

type GatedService = VotingService<InMemoryLedgerStore, GatedOracle, ManualClock>;

fn gated_service(oracle: Arc<GatedOracle>) -> Arc<GatedService> {
    Arc::new(VotingService::new(
        VotingConfig::default(),
        Arc::new(InMemoryLedgerStore::new()),
        oracle,
        Arc::new(ManualClock::new(T0)),
    ))
}

async fn wait_for_gauge(expected: f64) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while PROPOSAL_LOCKS.get() != expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("gauge stuck at {}, expected {expected}", PROPOSAL_LOCKS.get()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lock_gauge_sums_over_services() {
    register_metrics().unwrap();
    let baseline = PROPOSAL_LOCKS.get();

    let oracle = Arc::new(GatedOracle {
        gate: Semaphore::new(0),
    });
    let first = gated_service(oracle.clone());
    let second = gated_service(oracle.clone());

    let mut votes = Vec::new();
    for (index, service) in [first.clone(), second.clone()].into_iter().enumerate() {
        let proposal = service
            .create_proposal(principal(500), proposal_request(1, -10, 100))
            .await
            .unwrap();
        let voter = principal(index as u32);
        let credential = token_account(index as u32);
        votes.push(tokio::spawn(async move {
            service.cast_vote(proposal, voter, credential, vec![1]).await
        }));
    }

    // Both votes hold their proposal lock while parked in the oracle
    wait_for_gauge(baseline + 2.0).await;
    assert_eq!(first.active_locks(), 1);
    assert_eq!(second.active_locks(), 1);

    oracle.gate.add_permits(2);
    for vote in votes {
        assert_eq!(vote.await.unwrap().unwrap().total_votes_cast, 1);
    }
    wait_for_gauge(baseline).await;
}
