use crate::ballots::{quadratic_cost, Ballot, QuadraticBallot};
use crate::tiebreak::{leaders, settle, TieBreaker};
use crate::types::{candidate_ids, ratio, zero_counts, Candidate, ElectionResult, VoteCounts};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of a quadratic-voting election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticResult {
    #[serde(flatten)]
    pub outcome: ElectionResult,

    /// Net (support minus opposition) votes per candidate; identical to `outcome.vote_counts`.
    pub vote_totals: VoteCounts,

    /// Credits spent on known candidates across non-abstaining ballots.
    pub total_credits_spent: i64,

    /// Sum of the credit budgets of non-abstaining ballots.
    pub total_credits_available: i64,

    /// `total_credits_spent / total_credits_available`.
    pub overall_utilization: f64,

    /// Mean of each non-abstaining ballot's own spent-to-budget ratio.
    pub avg_voter_utilization: f64,

    pub candidates_with_negative_totals: usize,
}

/// Resolves an election by quadratic voting.
///
/// Allocations to unknown ids are excluded from both the net totals and the credit metrics.
/// If no ballot allocated anything to a known candidate there is no winner, and the tie-break
/// is not consulted; otherwise the highest net total wins.
pub fn resolve_quadratic<T>(
    candidates: &[Candidate],
    ballots: &[QuadraticBallot],
    tiebreak: &mut T,
) -> QuadraticResult
where
    T: TieBreaker + ?Sized,
{
    let ids = candidate_ids(candidates);
    let mut vote_totals = zero_counts(&ids);
    let mut abstentions = 0;
    let mut total_credits_spent: i64 = 0;
    let mut total_credits_available: i64 = 0;
    let mut voter_utilizations: Vec<f64> = Vec::new();
    let mut counted_allocations = 0usize;

    for ballot in ballots {
        if ballot.is_abstention() {
            abstentions += 1;
            continue;
        }

        let mut known_cost: i64 = 0;
        for (candidate, &votes) in ballot.allocations() {
            if let Some(total) = vote_totals.get_mut(candidate) {
                *total = total.saturating_add(votes);
                counted_allocations += 1;
                known_cost = known_cost.saturating_add(quadratic_cost(votes));
            }
        }

        total_credits_spent = total_credits_spent.saturating_add(known_cost);
        total_credits_available = total_credits_available.saturating_add(ballot.credit_budget());
        voter_utilizations.push(ratio(known_cost, ballot.credit_budget()));
    }

    let overall_utilization = ratio(total_credits_spent, total_credits_available);
    let avg_voter_utilization = if voter_utilizations.is_empty() {
        0.0
    } else {
        voter_utilizations.iter().sum::<f64>() / voter_utilizations.len() as f64
    };
    let candidates_with_negative_totals = vote_totals.values().filter(|&&total| total < 0).count();

    let (winners, tiebreak_applied) = if counted_allocations == 0 {
        (Vec::new(), false)
    } else {
        settle(leaders(&ids, &vote_totals), tiebreak)
    };
    debug!(
        ballots = ballots.len(),
        abstentions,
        counted_allocations,
        total_credits_spent,
        ?winners,
        tiebreak_applied,
        "quadratic resolved"
    );

    QuadraticResult {
        outcome: ElectionResult {
            winners,
            vote_counts: vote_totals.clone(),
            total_ballots: ballots.len(),
            abstentions,
            tiebreak_applied,
        },
        vote_totals,
        total_credits_spent,
        total_credits_available,
        overall_utilization,
        avg_voter_utilization,
        candidates_with_negative_totals,
    }
}
