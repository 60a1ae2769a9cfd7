//! # Governance Events
//!
//! Every event the voting core emits after a committed state change.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Principal, Timestamp};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    /// A proposal record was allocated.
    ProposalCreated {
        /// Derived address of the proposal.
        proposal: Address,
        /// Principal that created (and owns) the proposal.
        creator: Principal,
        /// Creator-chosen sequence number.
        sequence_number: u64,
        /// Voting window start.
        voting_start: Timestamp,
        /// Voting window end.
        voting_end: Timestamp,
    },

    /// A vote receipt was allocated and the proposal counter incremented.
    ///
    /// The ballot is opaque here; off-chain tallying consumes it.
    VoteCast {
        /// Proposal voted on.
        proposal: Address,
        /// Governance credential account used to vote.
        credential: Address,
        /// Principal that authorized (and paid for) the vote.
        voter: Principal,
        /// Encrypted ballot exactly as submitted.
        encrypted_vote: Vec<u8>,
        /// Clock reading at execution time.
        timestamp: Timestamp,
    },

    /// A proposal was finalized with creator-supplied tallies.
    VoteFinalized {
        /// Finalized proposal.
        proposal: Address,
        /// Final yes tally.
        yes_votes: u64,
        /// Final no tally.
        no_votes: u64,
        /// Number of receipts allocated during the window.
        total_votes_cast: u64,
        /// Principal that finalized (always the creator).
        finalizer: Principal,
    },
}

impl GovernanceEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ProposalCreated { .. } => EventTopic::Proposals,
            Self::VoteCast { .. } => EventTopic::Votes,
            Self::VoteFinalized { .. } => EventTopic::Finalization,
        }
    }

    /// The proposal this event concerns.
    #[must_use]
    pub fn proposal(&self) -> Address {
        match self {
            Self::ProposalCreated { proposal, .. }
            | Self::VoteCast { proposal, .. }
            | Self::VoteFinalized { proposal, .. } => *proposal,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Proposal creation.
    Proposals,
    /// Vote casting.
    Votes,
    /// Proposal finalization.
    Finalization,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Proposals to include. Empty means all proposals.
    pub proposals: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            proposals: Vec::new(),
        }
    }

    /// Create a filter for events about specific proposals.
    #[must_use]
    pub fn for_proposals(proposals: Vec<Address>) -> Self {
        Self {
            topics: Vec::new(),
            proposals,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &GovernanceEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let proposal_match =
            self.proposals.is_empty() || self.proposals.contains(&event.proposal());

        topic_match && proposal_match
    }
}
