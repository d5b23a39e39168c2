use super::Ballot;
use crate::error::InvalidScoreError;
use crate::types::{CandidateId, VoterId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Lowest score a voter may give.
pub const MIN_SCORE: i64 = 0;

/// Highest score a voter may give.
pub const MAX_SCORE: i64 = 10;

/// A ballot rating candidates from [`MIN_SCORE`] to [`MAX_SCORE`].
///
/// Unscored candidates count as 0. No scores at all is an abstention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBallot {
    voter_id: VoterId,
    scores: BTreeMap<CandidateId, i64>,
}

impl ScoreBallot {
    /// Builds a validated ballot.
    ///
    /// # Errors
    /// Returns [`InvalidScoreError::DuplicateCandidate`] when a candidate is scored twice, and
    /// [`InvalidScoreError::OutOfRange`] naming the first offending candidate otherwise.
    pub fn new(
        voter_id: impl Into<VoterId>,
        scores: impl IntoIterator<Item = (impl Into<CandidateId>, i64)>,
    ) -> Result<Self, InvalidScoreError> {
        let scores: Vec<(CandidateId, i64)> = scores
            .into_iter()
            .map(|(candidate, score)| (candidate.into(), score))
            .collect();

        let mut seen = BTreeSet::new();
        for (candidate, score) in &scores {
            if !seen.insert(candidate) {
                return Err(InvalidScoreError::DuplicateCandidate {
                    candidate: candidate.clone(),
                });
            }
            if !(MIN_SCORE..=MAX_SCORE).contains(score) {
                return Err(InvalidScoreError::OutOfRange {
                    candidate: candidate.clone(),
                    score: *score,
                });
            }
        }

        Ok(Self::new_unchecked(voter_id, scores))
    }

    /// Builds a ballot from already-trusted data without range checks.
    ///
    /// A candidate scored more than once keeps its last score.
    pub fn new_unchecked(
        voter_id: impl Into<VoterId>,
        scores: impl IntoIterator<Item = (impl Into<CandidateId>, i64)>,
    ) -> Self {
        Self {
            voter_id: voter_id.into(),
            scores: scores
                .into_iter()
                .map(|(candidate, score)| (candidate.into(), score))
                .collect(),
        }
    }

    pub fn abstain(voter_id: impl Into<VoterId>) -> Self {
        Self {
            voter_id: voter_id.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn scores(&self) -> &BTreeMap<CandidateId, i64> {
        &self.scores
    }

    /// Score given to `candidate`, 0 if unscored.
    pub fn score(&self, candidate: &CandidateId) -> i64 {
        self.scores.get(candidate).copied().unwrap_or(0)
    }

    pub fn candidates_scored(&self) -> usize {
        self.scores.len()
    }

    pub fn total_points_given(&self) -> i64 {
        self.scores.values().sum()
    }

    pub fn max_score_on_ballot(&self) -> Option<i64> {
        self.scores.values().max().copied()
    }

    pub fn min_score_on_ballot(&self) -> Option<i64> {
        self.scores.values().min().copied()
    }
}

impl Ballot for ScoreBallot {
    fn voter_id(&self) -> &VoterId {
        &self.voter_id
    }

    fn is_abstention(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let ballot = ScoreBallot::new("v1", [("alice", 0), ("bob", 10)]).unwrap();
        assert_eq!(ballot.score(&"alice".into()), 0);
        assert_eq!(ballot.score(&"bob".into()), 10);
        assert_eq!(ballot.score(&"carol".into()), 0);
        assert!(!ballot.is_abstention());
    }

    #[test]
    fn out_of_range_scores_name_the_candidate() {
        let err = ScoreBallot::new("v1", [("alice", 5), ("bob", 11)]).unwrap_err();
        assert_eq!(
            err,
            InvalidScoreError::OutOfRange {
                candidate: "bob".into(),
                score: 11
            }
        );
        assert!(ScoreBallot::new("v1", [("alice", -1)]).is_err());
    }

    #[test]
    fn unchecked_construction_keeps_raw_values() {
        let ballot = ScoreBallot::new_unchecked("v1", [("alice", 42)]);
        assert_eq!(ballot.score(&"alice".into()), 42);

        let repeated = ScoreBallot::new_unchecked("v2", [("alice", 3), ("alice", 8)]);
        assert_eq!(repeated.score(&"alice".into()), 8);
        assert_eq!(repeated.candidates_scored(), 1);
    }

    #[test]
    fn repeated_candidate_is_rejected() {
        let err = ScoreBallot::new("v1", [("alice", 7), ("bob", 2), ("alice", 7)]).unwrap_err();
        assert_eq!(
            err,
            InvalidScoreError::DuplicateCandidate {
                candidate: "alice".into()
            }
        );
        assert_eq!(err.to_string(), "candidate alice is scored more than once");
    }

    #[test]
    fn per_ballot_stats() {
        let ballot = ScoreBallot::new("v1", [("alice", 7), ("bob", 2), ("carol", 5)]).unwrap();
        assert_eq!(ballot.candidates_scored(), 3);
        assert_eq!(ballot.total_points_given(), 14);
        assert_eq!(ballot.max_score_on_ballot(), Some(7));
        assert_eq!(ballot.min_score_on_ballot(), Some(2));

        let empty = ScoreBallot::abstain("v2");
        assert!(empty.is_abstention());
        assert_eq!(empty.max_score_on_ballot(), None);
        assert_eq!(empty.min_score_on_ballot(), None);
    }
}
