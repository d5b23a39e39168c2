use crate::ballots::{ApprovalBallot, Ballot};
use crate::tiebreak::{leaders, settle, TieBreaker};
use crate::types::{candidate_ids, ratio, zero_counts, Candidate, CandidateId, ElectionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Outcome of an approval election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalResult {
    #[serde(flatten)]
    pub outcome: ElectionResult,

    /// Mean number of known candidates approved per non-abstaining ballot.
    pub avg_approvals_per_ballot: f64,

    /// Share of non-abstaining ballots approving each candidate.
    pub approval_rates: BTreeMap<CandidateId, f64>,
}

/// Resolves an election by approval voting.
///
/// Every known candidate approved on a non-abstaining ballot gains one approval; approvals of
/// unknown ids are dropped. The most-approved candidate wins.
pub fn resolve_approval<T>(
    candidates: &[Candidate],
    ballots: &[ApprovalBallot],
    tiebreak: &mut T,
) -> ApprovalResult
where
    T: TieBreaker + ?Sized,
{
    let ids = candidate_ids(candidates);
    let mut vote_counts = zero_counts(&ids);
    let mut abstentions = 0;
    let mut total_approvals: i64 = 0;

    for ballot in ballots {
        if ballot.is_abstention() {
            abstentions += 1;
            continue;
        }
        for candidate in ballot.approvals() {
            if let Some(count) = vote_counts.get_mut(candidate) {
                *count += 1;
                total_approvals += 1;
            }
        }
    }

    let non_abstaining = (ballots.len() - abstentions) as i64;
    let approval_rates = vote_counts
        .iter()
        .map(|(id, &count)| (id.clone(), ratio(count, non_abstaining)))
        .collect();

    let (winners, tiebreak_applied) = settle(leaders(&ids, &vote_counts), tiebreak);
    debug!(
        ballots = ballots.len(),
        abstentions,
        total_approvals,
        ?winners,
        tiebreak_applied,
        "approval resolved"
    );

    ApprovalResult {
        outcome: ElectionResult {
            winners,
            vote_counts,
            total_ballots: ballots.len(),
            abstentions,
            tiebreak_applied,
        },
        avg_approvals_per_ballot: ratio(total_approvals, non_abstaining),
        approval_rates,
    }
}
