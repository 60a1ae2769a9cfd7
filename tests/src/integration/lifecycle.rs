//! # Proposal Lifecycle
//!
//! End-to-end: create → vote → finalize through the public API, observed via
//! queries and the event bus.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{principal, proposal_request, Dao, T0};
    use dao_voting::{ProposalOutcome, ProposalPhase, VotingApi, VotingError};
    use shared_bus::{EventFilter, EventTopic, GovernanceEvent};

    /// Creator C, voters A (1000 tokens) and B (500 tokens), window
    /// [t-10, t+3600].
    #[tokio::test]
    async fn test_full_voting_round() {
        let dao = Dao::new();
        let creator = principal(1_000);
        let (alice, alice_tokens) = dao.voter(1, 1_000);
        let (bob, bob_tokens) = dao.voter(2, 500);

        let proposal = dao
            .service
            .create_proposal(creator, proposal_request(1, -10, 3_600))
            .await
            .unwrap();
        assert_eq!(dao.service.phase(proposal).await.unwrap(), ProposalPhase::Open);

        // A votes
        let cast = dao
            .service
            .cast_vote(proposal, alice, alice_tokens, b"enc:A".to_vec())
            .await
            .unwrap();
        assert_eq!(cast.total_votes_cast, 1);
        assert!(dao.service.has_voted(alice_tokens, proposal).await.unwrap());

        // B votes
        let cast = dao
            .service
            .cast_vote(proposal, bob, bob_tokens, b"enc:B".to_vec())
            .await
            .unwrap();
        assert_eq!(cast.total_votes_cast, 2);

        // A again
        let err = dao
            .service
            .cast_vote(proposal, alice, alice_tokens, b"enc:A2".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, VotingError::AlreadyVoted { .. }));
        let record = dao.service.get_proposal(proposal).await.unwrap().unwrap();
        assert_eq!(record.total_votes_cast, 2);

        // Window closes
        dao.clock.set(T0 + 3_601);
        assert_eq!(
            dao.service.phase(proposal).await.unwrap(),
            ProposalPhase::AwaitingFinalization
        );

        let result = dao
            .service
            .finalize_vote(proposal, creator, 2, 0, b"tally-proof".to_vec())
            .await
            .unwrap();
        assert_eq!(result.outcome, ProposalOutcome::Passed);

        let record = dao.service.get_proposal(proposal).await.unwrap().unwrap();
        assert!(record.finalized);
        assert_eq!((record.yes_votes, record.no_votes), (2, 0));

        // Second finalize
        let err = dao
            .service
            .finalize_vote(proposal, creator, 0, 2, b"tally-proof".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, VotingError::AlreadyFinalized { .. }));
        let record = dao.service.get_proposal(proposal).await.unwrap().unwrap();
        assert_eq!((record.yes_votes, record.no_votes), (2, 0));
    }

    #[tokio::test]
    async fn test_zero_balance_voter_leaves_no_trace() {
        let dao = Dao::new();
        let creator = principal(1_000);
        let (broke, broke_tokens) = dao.voter(3, 0);

        let proposal = dao
            .service
            .create_proposal(creator, proposal_request(1, -10, 3_600))
            .await
            .unwrap();
        let records = dao.store.len();

        let err = dao
            .service
            .cast_vote(proposal, broke, broke_tokens, vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, VotingError::Unauthorized { .. }));
        assert_eq!(dao.store.len(), records);
        assert!(dao.service.get_vote_receipt(broke_tokens, proposal).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_receipts_are_per_proposal() {
        let dao = Dao::new();
        let creator = principal(1_000);
        let (alice, alice_tokens) = dao.voter(1, 10);

        let first = dao
            .service
            .create_proposal(creator, proposal_request(1, -10, 100))
            .await
            .unwrap();
        let second = dao
            .service
            .create_proposal(creator, proposal_request(2, -10, 100))
            .await
            .unwrap();

        dao.service
            .cast_vote(first, alice, alice_tokens, vec![1])
            .await
            .unwrap();
        dao.service
            .cast_vote(second, alice, alice_tokens, vec![0])
            .await
            .unwrap();

        assert!(dao.service.has_voted(alice_tokens, first).await.unwrap());
        assert!(dao.service.has_voted(alice_tokens, second).await.unwrap());
    }

    #[tokio::test]
    async fn test_event_stream_for_one_proposal() {
        let dao = Dao::new();
        let creator = principal(1_000);
        let (alice, alice_tokens) = dao.voter(1, 10);

        let watched = dao.service.proposal_address(&creator, 7);
        let mut votes_on_watched = dao.bus.subscribe(EventFilter {
            topics: vec![EventTopic::Votes],
            proposals: vec![watched],
        });

        dao.service
            .create_proposal(creator, proposal_request(7, 0, 10))
            .await
            .unwrap();
        let other = dao
            .service
            .create_proposal(creator, proposal_request(8, 0, 10))
            .await
            .unwrap();
        dao.service
            .cast_vote(other, alice, alice_tokens, vec![9])
            .await
            .unwrap();
        dao.service
            .cast_vote(watched, alice, alice_tokens, vec![7])
            .await
            .unwrap();

        let events = votes_on_watched.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            GovernanceEvent::VoteCast { proposal, encrypted_vote, .. }
                if *proposal == watched && encrypted_vote.as_slice() == [7u8]
        ));
    }
}
