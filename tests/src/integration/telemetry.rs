//! Metrics exported after real voting traffic

#[cfg(test)]
mod tests {
    use super::super::fixtures::{principal, proposal_request, Dao};
    use dao_telemetry::{encode_metrics, register_metrics, OPERATIONS_REJECTED, VOTES_CAST};
    use dao_voting::VotingApi;

    #[tokio::test]
    async fn test_votes_and_rejections_are_exported() {
        register_metrics().unwrap();
        let dao = Dao::new();
        let (alice, alice_tokens) = dao.voter(1, 5);
        let proposal = dao
            .service
            .create_proposal(principal(77), proposal_request(1, -10, 100))
            .await
            .unwrap();

        let votes_before = VOTES_CAST.get();
        let rejected = OPERATIONS_REJECTED.with_label_values(&["cast_vote", "already_voted"]);
        let rejected_before = rejected.get();

        dao.service
            .cast_vote(proposal, alice, alice_tokens, vec![1])
            .await
            .unwrap();
        let _ = dao
            .service
            .cast_vote(proposal, alice, alice_tokens, vec![1])
            .await;

        // Other tests in this binary may vote concurrently
        assert!(VOTES_CAST.get() >= votes_before + 1.0);
        assert!(rejected.get() >= rejected_before + 1.0);

        let text = encode_metrics().unwrap();
        assert!(text.contains("dao_votes_cast_total"));
        assert!(text.contains("dao_operations_rejected_total"));
        assert!(text.contains("dao_operation_duration_seconds"));
    }
}
