//! Proposal entity
//!
//! State progression: Created (finalized = false) → Finalized

use serde::{Deserialize, Serialize};
use shared_types::{Address, Principal, Timestamp};

use crate::error::{VotingError, VotingResult};

/// Storage bound of the description field, in bytes.
pub const MAX_DESCRIPTION_BYTES: usize = 300;

/// Inclusive voting window `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl VotingWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Start lies after end. Such a window never accepts a vote.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn has_started(&self, now: Timestamp) -> bool {
        now >= self.start
    }

    /// Strictly past the end; a vote at exactly `end` is still inside.
    pub fn has_ended(&self, now: Timestamp) -> bool {
        now > self.end
    }

    pub fn contains(&self, now: Timestamp) -> bool {
        self.has_started(now) && !self.has_ended(now)
    }
}

/// Lifecycle phase of a proposal relative to a clock reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProposalPhase {
    /// Window not yet open
    Pending,
    /// Accepting votes
    Open,
    /// Window closed, creator may finalize
    AwaitingFinalization,
    /// Tallies recorded, terminal
    Finalized,
}

/// Result revealed by a finalized proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalOutcome {
    /// yes > no
    Passed,
    /// yes <= no
    Rejected,
}

impl ProposalOutcome {
    pub fn from_tallies(yes_votes: u64, no_votes: u64) -> Self {
        if yes_votes > no_votes {
            Self::Passed
        } else {
            Self::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Rejected => "rejected",
        }
    }
}

/// A votable question owned by its creator.
///
/// Field order is the persisted layout order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Principal that created the proposal; the only one allowed to finalize
    pub creator: Principal,
    /// Creator-chosen disambiguator, unique per creator
    pub sequence_number: u64,
    /// Free text, bounded by `MAX_DESCRIPTION_BYTES`
    pub description: String,
    pub voting_start: Timestamp,
    pub voting_end: Timestamp,
    /// Zero until finalized
    pub yes_votes: u64,
    /// Zero until finalized
    pub no_votes: u64,
    /// One per allocated vote receipt
    pub total_votes_cast: u64,
    pub finalized: bool,
}

impl Proposal {
    /// Fresh proposal with zeroed counters.
    pub fn new(
        creator: Principal,
        sequence_number: u64,
        description: String,
        voting_start: Timestamp,
        voting_end: Timestamp,
    ) -> Self {
        Self {
            creator,
            sequence_number,
            description,
            voting_start,
            voting_end,
            yes_votes: 0,
            no_votes: 0,
            total_votes_cast: 0,
            finalized: false,
        }
    }

    pub fn window(&self) -> VotingWindow {
        VotingWindow::new(self.voting_start, self.voting_end)
    }

    pub fn phase(&self, now: Timestamp) -> ProposalPhase {
        let window = self.window();
        if self.finalized {
            ProposalPhase::Finalized
        } else if !window.has_started(now) {
            ProposalPhase::Pending
        } else if !window.has_ended(now) {
            ProposalPhase::Open
        } else {
            ProposalPhase::AwaitingFinalization
        }
    }

    /// `None` until finalized.
    pub fn outcome(&self) -> Option<ProposalOutcome> {
        self.finalized
            .then(|| ProposalOutcome::from_tallies(self.yes_votes, self.no_votes))
    }

    /// Timing and state checks for casting, in rejection order.
    pub fn ensure_accepts_votes(&self, address: Address, now: Timestamp) -> VotingResult<()> {
        let window = self.window();
        if !window.has_started(now) {
            return Err(VotingError::VotingNotStarted {
                starts_at: self.voting_start,
                now,
            });
        }
        if window.has_ended(now) {
            return Err(VotingError::VotingEnded {
                ended_at: self.voting_end,
                now,
            });
        }
        // Only reachable if the clock went backwards after finalization
        if self.finalized {
            return Err(VotingError::AlreadyFinalized { proposal: address });
        }
        Ok(())
    }

    /// Count one accepted vote.
    pub fn record_vote(&mut self) -> VotingResult<u64> {
        self.total_votes_cast =
            self.total_votes_cast
                .checked_add(1)
                .ok_or(VotingError::Overflow {
                    field: "total_votes_cast",
                })?;
        Ok(self.total_votes_cast)
    }

    /// Authority, state and timing checks for finalization, in rejection order.
    pub fn ensure_finalizable(
        &self,
        address: Address,
        finalizer: Principal,
        now: Timestamp,
    ) -> VotingResult<()> {
        if finalizer != self.creator {
            return Err(VotingError::Unauthorized {
                principal: finalizer,
                reason: "only the creator may finalize",
            });
        }
        if self.finalized {
            return Err(VotingError::AlreadyFinalized { proposal: address });
        }
        if !self.window().has_ended(now) {
            return Err(VotingError::VotingPeriodNotEnded {
                ends_at: self.voting_end,
                now,
            });
        }
        Ok(())
    }

    /// Reject tallies that claim more votes than receipts were allocated.
    pub fn ensure_tally_within_cast(&self, yes_votes: u64, no_votes: u64) -> VotingResult<()> {
        let tallied = u128::from(yes_votes) + u128::from(no_votes);
        if tallied > u128::from(self.total_votes_cast) {
            return Err(VotingError::TallyExceedsVotesCast {
                tallied,
                cast: self.total_votes_cast,
            });
        }
        Ok(())
    }

    /// Record the tallies and enter the terminal state.
    pub fn finalize(&mut self, yes_votes: u64, no_votes: u64) -> ProposalOutcome {
        self.yes_votes = yes_votes;
        self.no_votes = no_votes;
        self.finalized = true;
        ProposalOutcome::from_tallies(yes_votes, no_votes)
    }
}
