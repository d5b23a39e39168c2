use super::Ballot;
use crate::types::{CandidateId, VoterId};
use serde::Serialize;

/// A ballot selecting one candidate, or none for an abstention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleChoiceBallot {
    voter_id: VoterId,
    choice: Option<CandidateId>,
}

impl SingleChoiceBallot {
    pub fn new(voter_id: impl Into<VoterId>, choice: Option<CandidateId>) -> Self {
        Self {
            voter_id: voter_id.into(),
            choice,
        }
    }

    /// The selected candidate, if any.
    pub fn choice(&self) -> Option<&CandidateId> {
        self.choice.as_ref()
    }
}

impl Ballot for SingleChoiceBallot {
    fn voter_id(&self) -> &VoterId {
        &self.voter_id
    }

    fn is_abstention(&self) -> bool {
        self.choice.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_and_abstention() {
        let ballot = SingleChoiceBallot::new("v1", Some("alice".into()));
        assert_eq!(ballot.choice(), Some(&"alice".into()));
        assert_eq!(ballot.voter_id().as_str(), "v1");
        assert!(!ballot.is_abstention());

        let blank = SingleChoiceBallot::new("v2", None);
        assert_eq!(blank.choice(), None);
        assert!(blank.is_abstention());
    }
}
