//! # Concurrency
//!
//! Races on a single proposal under a multi-threaded runtime:
//!
//! - same credential, many tasks: exactly one receipt
//! - many credentials: no lost increments
//! - many finalizers: exactly one terminal write
//! - two services sharing one store: compare-and-swap retries keep the count exact

#[cfg(test)]
mod tests {
    use super::super::fixtures::{principal, proposal_request, Dao, GOVERNANCE_MINT, T0};
    use dao_voting::adapters::{ManualClock, TokenBalanceOracle};
    use dao_voting::{VotingApi, VotingConfig, VotingError, VotingService};
    use futures::future::join_all;
    use std::collections::HashSet;
    use std::sync::Arc;

    const CREATOR_INDEX: u32 = 9_999;

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_same_credential_race_single_winner() {
        let dao = Dao::new();
        let creator = principal(CREATOR_INDEX);
        let (alice, alice_tokens) = dao.voter(1, 1_000);
        let proposal = dao
            .service
            .create_proposal(creator, proposal_request(1, -10, 3_600))
            .await
            .unwrap();

        let attempts: Vec<_> = (0..32u8)
            .map(|i| {
                let service = dao.service.clone();
                tokio::spawn(async move {
                    service
                        .cast_vote(proposal, alice, alice_tokens, vec![i])
                        .await
                })
            })
            .collect();

        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        let already_voted = results
            .iter()
            .filter(|r| matches!(r, Err(VotingError::AlreadyVoted { .. })))
            .count();
        assert_eq!(winners, 1);
        assert_eq!(already_voted, 31);

        let record = dao.service.get_proposal(proposal).await.unwrap().unwrap();
        assert_eq!(record.total_votes_cast, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_many_voters_no_lost_increments() {
        const VOTERS: u32 = 200;

        let dao = Dao::new();
        let creator = principal(CREATOR_INDEX);
        let proposal = dao
            .service
            .create_proposal(creator, proposal_request(1, -10, 3_600))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..VOTERS)
            .map(|i| {
                let (voter, tokens) = dao.voter(i, 1 + u64::from(i));
                let service = dao.service.clone();
                tokio::spawn(async move { service.cast_vote(proposal, voter, tokens, vec![1]).await })
            })
            .collect();

        let mut totals = HashSet::new();
        for task in join_all(tasks).await {
            let result = task.unwrap().unwrap();
            assert!(totals.insert(result.total_votes_cast), "duplicate counter value");
        }

        // Every counter value 1..=VOTERS was observed exactly once
        assert_eq!(totals, (1..=u64::from(VOTERS)).collect::<HashSet<_>>());
        let record = dao.service.get_proposal(proposal).await.unwrap().unwrap();
        assert_eq!(record.total_votes_cast, u64::from(VOTERS));
        assert_eq!(dao.service.active_locks(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_finalizers_single_winner() {
        let dao = Dao::new();
        let creator = principal(CREATOR_INDEX);
        let proposal = dao
            .service
            .create_proposal(creator, proposal_request(1, -10, 10))
            .await
            .unwrap();
        dao.clock.set(T0 + 11);

        let tasks: Vec<_> = (0..16u64)
            .map(|i| {
                let service = dao.service.clone();
                tokio::spawn(async move {
                    service
                        .finalize_vote(proposal, creator, i, 16 - i, vec![0xF1])
                        .await
                })
            })
            .collect();

        let results: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let winner: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winner.len(), 1);
        assert!(results.iter().all(|r| r.is_ok()
            || matches!(r, Err(VotingError::AlreadyFinalized { .. }))));

        // Stored tallies are the winner's
        let record = dao.service.get_proposal(proposal).await.unwrap().unwrap();
        assert!(record.finalized);
        assert_eq!(
            (record.yes_votes, record.no_votes),
            (winner[0].yes_votes, winner[0].no_votes)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_creates() {
        let dao = Dao::new();
        let creator = principal(CREATOR_INDEX);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let service = dao.service.clone();
                tokio::spawn(async move {
                    service
                        .create_proposal(creator, proposal_request(42, 0, 10))
                        .await
                })
            })
            .collect();

        let results: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(VotingError::AlreadyExists { .. })))
                .count(),
            7
        );
    }

    /// Two service instances do not share per-proposal locks, so their commits
    /// race at the store and rely on compare-and-swap retries.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_two_services_one_store() {
        const VOTERS: u32 = 100;

        let dao = Dao::with_config(VotingConfig {
            max_commit_attempts: 1_000,
            ..VotingConfig::default()
        });
        let oracle = Arc::new(TokenBalanceOracle::new(GOVERNANCE_MINT));
        let twin = Arc::new(VotingService::new(
            VotingConfig {
                max_commit_attempts: 1_000,
                ..VotingConfig::default()
            },
            dao.store.clone(),
            oracle.clone(),
            Arc::new(ManualClock::new(T0)),
        ));

        let creator = principal(CREATOR_INDEX);
        let proposal = dao
            .service
            .create_proposal(creator, proposal_request(1, -10, 3_600))
            .await
            .unwrap();
        assert_eq!(twin.proposal_address(&creator, 1), proposal);

        let mut tasks = Vec::new();
        for i in 0..VOTERS {
            let (voter, tokens) = dao.voter(i, 10);
            oracle.mint_to(tokens, voter, 10);
            if i % 2 == 0 {
                let service = dao.service.clone();
                tasks.push(tokio::spawn(async move {
                    service.cast_vote(proposal, voter, tokens, vec![0]).await
                }));
            } else {
                let service = twin.clone();
                tasks.push(tokio::spawn(async move {
                    service.cast_vote(proposal, voter, tokens, vec![1]).await
                }));
            }
        }

        for task in join_all(tasks).await {
            task.unwrap().unwrap();
        }

        let record = dao.service.get_proposal(proposal).await.unwrap().unwrap();
        assert_eq!(record.total_votes_cast, u64::from(VOTERS));
    }
}
