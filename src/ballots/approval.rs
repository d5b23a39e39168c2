use super::Ballot;
use crate::types::{CandidateId, VoterId};
use serde::Serialize;
use std::collections::BTreeSet;

/// A ballot approving any number of candidates, all treated equally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalBallot {
    voter_id: VoterId,
    approvals: BTreeSet<CandidateId>,
}

impl ApprovalBallot {
    /// Builds a ballot from the approved candidates. Repeated ids collapse into one approval;
    /// no approvals at all is an abstention.
    pub fn new(
        voter_id: impl Into<VoterId>,
        approvals: impl IntoIterator<Item = impl Into<CandidateId>>,
    ) -> Self {
        Self {
            voter_id: voter_id.into(),
            approvals: approvals.into_iter().map(Into::into).collect(),
        }
    }

    pub fn abstain(voter_id: impl Into<VoterId>) -> Self {
        Self {
            voter_id: voter_id.into(),
            approvals: BTreeSet::new(),
        }
    }

    pub fn approvals(&self) -> &BTreeSet<CandidateId> {
        &self.approvals
    }

    pub fn approves(&self, candidate: &CandidateId) -> bool {
        self.approvals.contains(candidate)
    }

    /// Number of candidates approved on this ballot.
    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }
}

impl Ballot for ApprovalBallot {
    fn voter_id(&self) -> &VoterId {
        &self.voter_id
    }

    fn is_abstention(&self) -> bool {
        self.approvals.is_empty()
    }
}
