use super::Ballot;
use crate::error::InvalidQuadraticBallotError;
use crate::types::{ratio, CandidateId, VoterId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Credits each voter may spend unless configured otherwise.
pub const DEFAULT_CREDIT_BUDGET: i64 = 100;

/// Validation rules for [`QuadraticBallot::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadraticRules {
    /// Total credits the voter may spend; `v` votes cost `v * v`.
    pub credit_budget: i64,

    /// Whether negative (opposing) votes are accepted.
    pub allow_negative: bool,
}

impl Default for QuadraticRules {
    fn default() -> Self {
        Self {
            credit_budget: DEFAULT_CREDIT_BUDGET,
            allow_negative: true,
        }
    }
}

/// A ballot allocating signed votes from a credit budget at quadratic cost.
///
/// Positive votes support a candidate, negative votes oppose it. Unallocated candidates
/// receive 0 votes. No allocations at all is an abstention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuadraticBallot {
    voter_id: VoterId,
    allocations: BTreeMap<CandidateId, i64>,
    credit_budget: i64,
}

impl QuadraticBallot {
    /// Builds a validated ballot.
    ///
    /// # Errors
    /// Rejects a candidate allocated more than once, zero-valued allocations, negative votes
    /// when `rules.allow_negative` is false, and a total cost above `rules.credit_budget`.
    pub fn new(
        voter_id: impl Into<VoterId>,
        allocations: impl IntoIterator<Item = (impl Into<CandidateId>, i64)>,
        rules: QuadraticRules,
    ) -> Result<Self, InvalidQuadraticBallotError> {
        let allocations: Vec<(CandidateId, i64)> = allocations
            .into_iter()
            .map(|(candidate, votes)| (candidate.into(), votes))
            .collect();

        let mut seen = BTreeSet::new();
        for (candidate, _) in &allocations {
            if !seen.insert(candidate) {
                return Err(InvalidQuadraticBallotError::DuplicateCandidate {
                    candidate: candidate.clone(),
                });
            }
        }

        let ballot = Self::new_unchecked(voter_id, allocations, rules.credit_budget);

        for (candidate, &votes) in &ballot.allocations {
            if votes == 0 {
                return Err(InvalidQuadraticBallotError::ZeroVotes {
                    candidate: candidate.clone(),
                });
            }
            if votes < 0 && !rules.allow_negative {
                return Err(InvalidQuadraticBallotError::NegativeVotes {
                    candidate: candidate.clone(),
                    votes,
                });
            }
        }

        let total_cost = ballot.total_cost();
        if total_cost > ballot.credit_budget {
            return Err(InvalidQuadraticBallotError::BudgetExceeded {
                total_cost,
                credit_budget: ballot.credit_budget,
            });
        }
        Ok(ballot)
    }

    /// Builds a ballot from already-trusted data without any checks.
    ///
    /// A candidate allocated more than once keeps its last allocation.
    pub fn new_unchecked(
        voter_id: impl Into<VoterId>,
        allocations: impl IntoIterator<Item = (impl Into<CandidateId>, i64)>,
        credit_budget: i64,
    ) -> Self {
        Self {
            voter_id: voter_id.into(),
            allocations: allocations
                .into_iter()
                .map(|(candidate, votes)| (candidate.into(), votes))
                .collect(),
            credit_budget,
        }
    }

    pub fn abstain(voter_id: impl Into<VoterId>, credit_budget: i64) -> Self {
        Self {
            voter_id: voter_id.into(),
            allocations: BTreeMap::new(),
            credit_budget,
        }
    }

    pub fn allocations(&self) -> &BTreeMap<CandidateId, i64> {
        &self.allocations
    }

    pub fn credit_budget(&self) -> i64 {
        self.credit_budget
    }

    /// Votes allocated to `candidate`, 0 if unallocated.
    pub fn votes(&self, candidate: &CandidateId) -> i64 {
        self.allocations.get(candidate).copied().unwrap_or(0)
    }

    pub fn candidates_voted_for(&self) -> usize {
        self.allocations.len()
    }

    /// Credits spent on this ballot: the sum of squared allocations.
    pub fn total_cost(&self) -> i64 {
        self.allocations
            .values()
            .fold(0i64, |total, &votes| total.saturating_add(quadratic_cost(votes)))
    }

    pub fn credits_remaining(&self) -> i64 {
        self.credit_budget - self.total_cost()
    }

    /// Fraction of the budget spent, 0 when the budget is 0.
    pub fn credit_utilization(&self) -> f64 {
        ratio(self.total_cost(), self.credit_budget)
    }
}

impl Ballot for QuadraticBallot {
    fn voter_id(&self) -> &VoterId {
        &self.voter_id
    }

    fn is_abstention(&self) -> bool {
        self.allocations.is_empty()
    }
}

/// Credit cost of casting `votes` votes for one candidate.
pub fn quadratic_cost(votes: i64) -> i64 {
    votes.saturating_mul(votes)
}

/// Most votes a single candidate can receive within `credit_budget`.
pub fn max_votes_for_budget(credit_budget: i64) -> i64 {
    if credit_budget <= 0 {
        return 0;
    }
    let mut root = (credit_budget as f64).sqrt() as i64;
    while quadratic_cost(root) > credit_budget {
        root -= 1;
    }
    while quadratic_cost(root + 1) <= credit_budget {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn costs_and_remaining_credits() {
        let ballot =
            QuadraticBallot::new("v1", [("alice", 5), ("bob", -3)], QuadraticRules::default())
                .unwrap();
        assert_eq!(ballot.total_cost(), 34);
        assert_eq!(ballot.credits_remaining(), 66);
        assert!((ballot.credit_utilization() - 0.34).abs() < 1e-9);
        assert_eq!(ballot.votes(&"bob".into()), -3);
        assert_eq!(ballot.votes(&"carol".into()), 0);
        assert_eq!(ballot.candidates_voted_for(), 2);
    }

    #[test]
    fn spending_the_whole_budget_is_allowed() {
        let ballot =
            QuadraticBallot::new("v1", [("alice", 10)], QuadraticRules::default()).unwrap();
        assert_eq!(ballot.credits_remaining(), 0);

        let err = QuadraticBallot::new("v1", [("alice", 10), ("bob", 1)], QuadraticRules::default())
            .unwrap_err();
        assert_eq!(
            err,
            InvalidQuadraticBallotError::BudgetExceeded {
                total_cost: 101,
                credit_budget: 100
            }
        );
    }

    #[test]
    fn zero_and_disallowed_negative_votes_are_rejected() {
        let err =
            QuadraticBallot::new("v1", [("alice", 0)], QuadraticRules::default()).unwrap_err();
        assert_eq!(
            err,
            InvalidQuadraticBallotError::ZeroVotes {
                candidate: "alice".into()
            }
        );

        let rules = QuadraticRules {
            allow_negative: false,
            ..QuadraticRules::default()
        };
        let err = QuadraticBallot::new("v1", [("alice", 2), ("bob", -1)], rules).unwrap_err();
        assert_eq!(
            err,
            InvalidQuadraticBallotError::NegativeVotes {
                candidate: "bob".into(),
                votes: -1
            }
        );
    }

    #[test]
    fn repeated_candidate_cannot_dodge_the_budget() {
        let err = QuadraticBallot::new(
            "v1",
            [("alice", 7), ("alice", 7)],
            QuadraticRules::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            InvalidQuadraticBallotError::DuplicateCandidate {
                candidate: "alice".into()
            }
        );

        let unchecked = QuadraticBallot::new_unchecked("v1", [("alice", 2), ("alice", 5)], 100);
        assert_eq!(unchecked.votes(&"alice".into()), 5);
        assert_eq!(unchecked.total_cost(), 25);
    }

    #[test]
    fn custom_budget_and_zero_budget_utilization() {
        let rules = QuadraticRules {
            credit_budget: 9,
            ..QuadraticRules::default()
        };
        assert!(QuadraticBallot::new("v1", [("alice", 3)], rules).is_ok());
        assert!(QuadraticBallot::new("v1", [("alice", 4)], rules).is_err());

        let broke = QuadraticBallot::new_unchecked("v1", [("alice", 1)], 0);
        assert_eq!(broke.credit_utilization(), 0.0);
    }

    #[test]
    fn max_votes_is_integer_square_root() {
        assert_eq!(max_votes_for_budget(100), 10);
        assert_eq!(max_votes_for_budget(99), 9);
        assert_eq!(max_votes_for_budget(1), 1);
        assert_eq!(max_votes_for_budget(0), 0);
        assert_eq!(max_votes_for_budget(-4), 0);
    }

    #[quickcheck]
    fn construction_fails_iff_cost_exceeds_budget(votes: Vec<i8>, budget: u16) -> bool {
        let allocations: Vec<(String, i64)> = votes
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(i, &v)| (format!("c{i}"), i64::from(v)))
            .collect();
        let expected_cost: i64 = allocations.iter().map(|(_, v)| v * v).sum();
        let rules = QuadraticRules {
            credit_budget: i64::from(budget),
            allow_negative: true,
        };
        match QuadraticBallot::new("v", allocations, rules) {
            Ok(ballot) => {
                ballot.total_cost() == expected_cost && expected_cost <= rules.credit_budget
            }
            Err(_) => expected_cost > rules.credit_budget,
        }
    }
}
