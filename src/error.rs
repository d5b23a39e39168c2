use crate::ballots::BallotKind;
use crate::election::ElectionMethod;
use crate::types::{CandidateId, VoterId};
use thiserror::Error;

/// Errors raised while building a ranked-choice ballot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRankingError {
    /// The same candidate appears more than once.
    #[error("ranking contains duplicate candidates: {}", id_list(.duplicates))]
    Duplicates { duplicates: Vec<CandidateId> },

    /// Known candidates are missing from the ranking.
    #[error("ranking is incomplete, missing candidates: {}", id_list(.missing))]
    Incomplete { missing: Vec<CandidateId> },

    /// The ranking names candidates outside the known set.
    #[error("ranking contains unknown candidates: {}", id_list(.extra))]
    UnknownCandidates { extra: Vec<CandidateId> },

    /// Both of the above at once.
    #[error(
        "ranking has wrong candidates, missing: {}, extra: {}",
        id_list(.missing),
        id_list(.extra)
    )]
    WrongCandidates {
        missing: Vec<CandidateId>,
        extra: Vec<CandidateId>,
    },
}

/// Errors raised while building a score ballot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidScoreError {
    /// A score falls outside the allowed range.
    #[error(
        "score for {candidate} must be {}-{}, got {score}",
        crate::MIN_SCORE,
        crate::MAX_SCORE
    )]
    OutOfRange { candidate: CandidateId, score: i64 },

    /// The same candidate is scored more than once.
    #[error("candidate {candidate} is scored more than once")]
    DuplicateCandidate { candidate: CandidateId },
}

/// Errors raised while building a quadratic ballot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidQuadraticBallotError {
    /// Zero votes must be expressed by omitting the candidate.
    #[error("votes for {candidate} must be non-zero (remove the candidate to allocate 0 votes)")]
    ZeroVotes { candidate: CandidateId },

    /// Opposition votes were disabled for this ballot.
    #[error("negative votes not allowed: {candidate} has {votes} votes")]
    NegativeVotes { candidate: CandidateId, votes: i64 },

    /// The sum of squared allocations is larger than the budget.
    #[error("total cost {total_cost} exceeds credit budget {credit_budget}")]
    BudgetExceeded { total_cost: i64, credit_budget: i64 },

    /// The same candidate receives more than one allocation.
    #[error("candidate {candidate} has more than one allocation")]
    DuplicateCandidate { candidate: CandidateId },
}

/// Any error the library can produce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VotingError {
    #[error(transparent)]
    InvalidRanking(#[from] InvalidRankingError),

    #[error(transparent)]
    InvalidScore(#[from] InvalidScoreError),

    #[error(transparent)]
    InvalidQuadraticBallot(#[from] InvalidQuadraticBallotError),

    /// A ballot handed to [`crate::resolve`] does not match the method.
    #[error("{method} expects {expected} ballots, but ballot from voter {voter_id} is {found}")]
    BallotKindMismatch {
        method: ElectionMethod,
        expected: BallotKind,
        found: BallotKind,
        voter_id: VoterId,
    },

    #[error("unknown election method: {name}")]
    UnknownMethod { name: String },
}

fn id_list(ids: &[CandidateId]) -> String {
    ids.iter()
        .map(CandidateId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_offending_candidates() {
        let err = InvalidRankingError::WrongCandidates {
            missing: vec!["carol".into()],
            extra: vec!["dave".into(), "erin".into()],
        };
        assert_eq!(
            err.to_string(),
            "ranking has wrong candidates, missing: carol, extra: dave, erin"
        );

        let err = InvalidScoreError::OutOfRange {
            candidate: "bob".into(),
            score: 11,
        };
        assert_eq!(err.to_string(), "score for bob must be 0-10, got 11");

        let err = InvalidQuadraticBallotError::NegativeVotes {
            candidate: "alice".into(),
            votes: -3,
        };
        assert_eq!(
            err.to_string(),
            "negative votes not allowed: alice has -3 votes"
        );
    }

    #[test]
    fn family_errors_convert_into_voting_error() {
        let err: VotingError = InvalidQuadraticBallotError::BudgetExceeded {
            total_cost: 101,
            credit_budget: 100,
        }
        .into();
        assert!(matches!(err, VotingError::InvalidQuadraticBallot(_)));
        assert_eq!(err.to_string(), "total cost 101 exceeds credit budget 100");
    }
}
