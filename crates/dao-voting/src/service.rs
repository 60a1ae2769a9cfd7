//! Voting Service - Core business logic
//!
//! Every state-changing operation runs as one transaction:
//!
//! 1. take the per-proposal lock
//! 2. read the clock and load the proposal
//! 3. run the precondition checks in their fixed order
//! 4. commit all writes in one batch (create-only receipt/proposal,
//!    compare-and-swap on the proposal)
//! 5. publish the event, then release the lock
//!
//! A compare-and-swap conflict re-runs steps 2-4, up to
//! `VotingConfig::max_commit_attempts` times.

use crate::adapters::{Blake3AddressDeriver, NonEmptyProofVerifier};
use crate::config::VotingConfig;
use crate::domain::{
    decode, encode, Proposal, ProposalPhase, RecordSeeds, VoteReceipt, VotingWindow,
};
use crate::error::{StoreError, VotingError, VotingResult};
use crate::locks::ProposalLocks;
use crate::metrics;
use crate::ports::inbound::{FinalizeResult, NewProposal, VoteCastResult, VotingApi};
use crate::ports::outbound::{
    AddressDeriver, Clock, CredentialOracle, LedgerStore, ProofVerifier, WriteOp,
};
use async_trait::async_trait;
use shared_bus::{EventPublisher, GovernanceEvent, NoopPublisher};
use shared_types::{Address, Principal};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const OP_CREATE: &str = "create_proposal";
const OP_CAST: &str = "cast_vote";
const OP_FINALIZE: &str = "finalize_vote";

/// Voting Service implementation
pub struct VotingService<L, O, C>
where
    L: LedgerStore,
    O: CredentialOracle,
    C: Clock,
{
    config: VotingConfig,
    store: Arc<L>,
    oracle: Arc<O>,
    clock: Arc<C>,
    deriver: Arc<dyn AddressDeriver>,
    verifier: Arc<dyn ProofVerifier>,
    publisher: Arc<dyn EventPublisher>,
    locks: ProposalLocks,
}

impl<L, O, C> VotingService<L, O, C>
where
    L: LedgerStore,
    O: CredentialOracle,
    C: Clock,
{
    /// Create a service with the BLAKE3 deriver, the non-empty proof check
    /// and no event observers.
    pub fn new(config: VotingConfig, store: Arc<L>, oracle: Arc<O>, clock: Arc<C>) -> Self {
        let deriver = Arc::new(Blake3AddressDeriver::new(config.program_id));
        Self {
            config,
            store,
            oracle,
            clock,
            deriver,
            verifier: Arc::new(NonEmptyProofVerifier),
            publisher: Arc::new(NoopPublisher::default()),
            locks: ProposalLocks::new(),
        }
    }

    /// Publish lifecycle events to `publisher`
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Replace the proof verifier consulted for non-empty proofs
    pub fn with_proof_verifier(mut self, verifier: Arc<dyn ProofVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// Replace the address deriver
    pub fn with_address_deriver(mut self, deriver: Arc<dyn AddressDeriver>) -> Self {
        self.deriver = deriver;
        self
    }

    pub fn config(&self) -> &VotingConfig {
        &self.config
    }

    /// Address of the proposal record for a (creator, sequence number) pair
    pub fn derive_proposal_address(&self, creator: &Principal, sequence_number: u64) -> Address {
        self.deriver
            .derive_address(&RecordSeeds::proposal(creator, sequence_number))
    }

    /// Address of the receipt for a (credential, proposal) pair
    pub fn receipt_address(&self, credential: &Address, proposal: &Address) -> Address {
        self.deriver
            .derive_address(&RecordSeeds::vote_receipt(credential, proposal))
    }

    /// Per-proposal locks currently registered
    pub fn active_locks(&self) -> usize {
        self.locks.len()
    }

    async fn load_proposal(&self, address: &Address) -> VotingResult<Option<(Proposal, Vec<u8>)>> {
        match self.store.load(address).await? {
            Some(raw) => Ok(Some((decode(&raw)?, raw))),
            None => Ok(None),
        }
    }

    /// Load a proposal together with the raw bytes for compare-and-swap.
    async fn require_proposal(&self, address: &Address) -> VotingResult<(Proposal, Vec<u8>)> {
        self.load_proposal(address)
            .await?
            .ok_or(VotingError::ProposalNotFound { address: *address })
    }

    fn observe<T>(&self, operation: &'static str, result: VotingResult<T>) -> VotingResult<T> {
        if let Err(err) = &result {
            warn!(
                operation,
                reason = err.reason(),
                class = ?err.class(),
                error = %err,
                "Operation rejected"
            );
            metrics::record_rejection(operation, err.reason());
        }
        result
    }

    async fn try_create_proposal(
        &self,
        creator: Principal,
        request: NewProposal,
    ) -> VotingResult<Address> {
        let NewProposal {
            sequence_number,
            description,
            voting_start,
            voting_end,
        } = request;

        let address = self.derive_proposal_address(&creator, sequence_number);
        let _guard = self.locks.acquire(address).await;

        // An occupied address wins over every field check
        if self.store.load(&address).await?.is_some() {
            return Err(VotingError::AlreadyExists { address });
        }

        let len = description.len();
        if len > self.config.max_description_bytes {
            return Err(VotingError::DescriptionTooLong {
                len,
                max: self.config.max_description_bytes,
            });
        }

        if VotingWindow::new(voting_start, voting_end).is_inverted() {
            if self.config.reject_inverted_window {
                return Err(VotingError::InvalidVotingWindow {
                    start: voting_start,
                    end: voting_end,
                });
            }
            warn!(voting_start, voting_end, "Voting window is inverted, no vote can succeed");
        }

        let record = Proposal::new(creator, sequence_number, description, voting_start, voting_end);
        let write = WriteOp::Create {
            address,
            data: encode(&record)?,
        };
        match self.store.commit(vec![write]).await {
            Ok(()) => {}
            Err(StoreError::AddressOccupied { .. }) => {
                return Err(VotingError::AlreadyExists { address })
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            proposal = %address,
            voting_start,
            voting_end,
            "Proposal created"
        );
        metrics::record_proposal_created();
        self.publisher
            .publish(GovernanceEvent::ProposalCreated {
                proposal: address,
                creator,
                sequence_number,
                voting_start,
                voting_end,
            })
            .await;

        Ok(address)
    }

    async fn try_cast_vote(
        &self,
        proposal: Address,
        voter: Principal,
        credential: Address,
        encrypted_vote: Vec<u8>,
    ) -> VotingResult<VoteCastResult> {
        let _guard = self.locks.acquire(proposal).await;
        let receipt_address = self.receipt_address(&credential, &proposal);
        let attempts = self.config.commit_attempts();

        for attempt in 1..=attempts {
            let now = self.clock.now();
            let (mut record, current) = self.require_proposal(&proposal).await?;

            if !self.oracle.holds_valid_credential(&voter, &credential).await? {
                return Err(VotingError::Unauthorized {
                    principal: voter,
                    reason: "credential not held or empty",
                });
            }
            record.ensure_accepts_votes(proposal, now)?;
            let total_votes_cast = record.record_vote()?;

            let receipt =
                VoteReceipt::new(proposal, credential, voter, encrypted_vote.clone(), now);
            let writes = vec![
                WriteOp::Create {
                    address: receipt_address,
                    data: encode(&receipt)?,
                },
                WriteOp::CompareAndSwap {
                    address: proposal,
                    expected: current,
                    data: encode(&record)?,
                },
            ];

            match self.store.commit(writes).await {
                Ok(()) => {
                    info!(
                        receipt = %receipt_address,
                        total_votes_cast,
                        timestamp = now,
                        "Vote cast"
                    );
                    metrics::record_vote_cast();
                    self.publisher
                        .publish(GovernanceEvent::VoteCast {
                            proposal,
                            credential,
                            voter,
                            encrypted_vote: receipt.encrypted_vote,
                            timestamp: now,
                        })
                        .await;
                    return Ok(VoteCastResult {
                        receipt: receipt_address,
                        total_votes_cast,
                    });
                }
                Err(StoreError::AddressOccupied { address }) if address == receipt_address => {
                    return Err(VotingError::AlreadyVoted {
                        credential,
                        proposal,
                    });
                }
                Err(StoreError::Conflict { .. }) => {
                    debug!(attempt, "Proposal changed before commit, retrying vote");
                    metrics::record_commit_retry();
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(VotingError::Contention { attempts })
    }

    async fn try_finalize_vote(
        &self,
        proposal: Address,
        finalizer: Principal,
        yes_votes: u64,
        no_votes: u64,
        proof: Vec<u8>,
    ) -> VotingResult<FinalizeResult> {
        let _guard = self.locks.acquire(proposal).await;
        let attempts = self.config.commit_attempts();

        for attempt in 1..=attempts {
            let now = self.clock.now();
            let (mut record, current) = self.require_proposal(&proposal).await?;

            record.ensure_finalizable(proposal, finalizer, now)?;
            if proof.is_empty() {
                return Err(VotingError::InvalidProof {
                    reason: "proof is empty",
                });
            }
            if !self.verifier.verify(&record, yes_votes, no_votes, &proof) {
                return Err(VotingError::InvalidProof {
                    reason: "proof rejected by verifier",
                });
            }
            if self.config.enforce_tally_bound {
                record.ensure_tally_within_cast(yes_votes, no_votes)?;
            }

            let outcome = record.finalize(yes_votes, no_votes);
            let write = WriteOp::CompareAndSwap {
                address: proposal,
                expected: current,
                data: encode(&record)?,
            };

            match self.store.commit(vec![write]).await {
                Ok(()) => {
                    info!(
                        yes_votes,
                        no_votes,
                        total_votes_cast = record.total_votes_cast,
                        outcome = outcome.as_str(),
                        "Proposal finalized"
                    );
                    metrics::record_proposal_finalized(outcome.as_str());
                    self.publisher
                        .publish(GovernanceEvent::VoteFinalized {
                            proposal,
                            yes_votes,
                            no_votes,
                            total_votes_cast: record.total_votes_cast,
                            finalizer,
                        })
                        .await;
                    return Ok(FinalizeResult {
                        yes_votes,
                        no_votes,
                        total_votes_cast: record.total_votes_cast,
                        outcome,
                    });
                }
                Err(StoreError::Conflict { .. }) => {
                    debug!(attempt, "Proposal changed before commit, retrying finalize");
                    metrics::record_commit_retry();
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(VotingError::Contention { attempts })
    }
}

#[async_trait]
impl<L, O, C> VotingApi for VotingService<L, O, C>
where
    L: LedgerStore + 'static,
    O: CredentialOracle + 'static,
    C: Clock + 'static,
{
    #[instrument(
        skip_all,
        fields(
            creator = %creator,
            sequence_number = proposal.sequence_number,
            request_id = %Uuid::new_v4(),
        )
    )]
    async fn create_proposal(
        &self,
        creator: Principal,
        proposal: NewProposal,
    ) -> VotingResult<Address> {
        let _timer = metrics::start_timer(OP_CREATE);
        let result = self.try_create_proposal(creator, proposal).await;
        self.observe(OP_CREATE, result)
    }

    #[instrument(
        skip_all,
        fields(
            proposal = %proposal,
            voter = %voter,
            credential = %credential,
            request_id = %Uuid::new_v4(),
        )
    )]
    async fn cast_vote(
        &self,
        proposal: Address,
        voter: Principal,
        credential: Address,
        encrypted_vote: Vec<u8>,
    ) -> VotingResult<VoteCastResult> {
        let _timer = metrics::start_timer(OP_CAST);
        let result = self
            .try_cast_vote(proposal, voter, credential, encrypted_vote)
            .await;
        self.observe(OP_CAST, result)
    }

    #[instrument(
        skip_all,
        fields(
            proposal = %proposal,
            finalizer = %finalizer,
            request_id = %Uuid::new_v4(),
        )
    )]
    async fn finalize_vote(
        &self,
        proposal: Address,
        finalizer: Principal,
        yes_votes: u64,
        no_votes: u64,
        proof: Vec<u8>,
    ) -> VotingResult<FinalizeResult> {
        let _timer = metrics::start_timer(OP_FINALIZE);
        let result = self
            .try_finalize_vote(proposal, finalizer, yes_votes, no_votes, proof)
            .await;
        self.observe(OP_FINALIZE, result)
    }

    async fn get_proposal(&self, proposal: Address) -> VotingResult<Option<Proposal>> {
        Ok(self.load_proposal(&proposal).await?.map(|(record, _)| record))
    }

    async fn get_vote_receipt(
        &self,
        credential: Address,
        proposal: Address,
    ) -> VotingResult<Option<VoteReceipt>> {
        let address = self.receipt_address(&credential, &proposal);
        match self.store.load(&address).await? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    async fn has_voted(&self, credential: Address, proposal: Address) -> VotingResult<bool> {
        let address = self.receipt_address(&credential, &proposal);
        Ok(self.store.load(&address).await?.is_some())
    }

    async fn phase(&self, proposal: Address) -> VotingResult<ProposalPhase> {
        let (record, _) = self.require_proposal(&proposal).await?;
        Ok(record.phase(self.clock.now()))
    }

    fn proposal_address(&self, creator: &Principal, sequence_number: u64) -> Address {
        self.derive_proposal_address(creator, sequence_number)
    }
}
