use crate::ballots::{Ballot, SingleChoiceBallot};
use crate::tiebreak::{leaders, settle, TieBreaker};
use crate::types::{candidate_ids, zero_counts, Candidate, ElectionResult};
use tracing::debug;

/// Resolves an election by plurality (first past the post).
///
/// Each non-abstaining ballot adds one vote to its choice if that choice is a known candidate;
/// votes for unknown ids are dropped. The highest count wins.
pub fn resolve_plurality<T>(
    candidates: &[Candidate],
    ballots: &[SingleChoiceBallot],
    tiebreak: &mut T,
) -> ElectionResult
where
    T: TieBreaker + ?Sized,
{
    let ids = candidate_ids(candidates);
    let mut vote_counts = zero_counts(&ids);
    let mut abstentions = 0;

    for ballot in ballots {
        if ballot.is_abstention() {
            abstentions += 1;
            continue;
        }
        // Votes for unknown ids are dropped.
        if let Some(choice) = ballot.choice() {
            if let Some(count) = vote_counts.get_mut(choice) {
                *count += 1;
            }
        }
    }

    let (winners, tiebreak_applied) = settle(leaders(&ids, &vote_counts), tiebreak);
    debug!(
        ballots = ballots.len(),
        abstentions,
        ?winners,
        tiebreak_applied,
        "plurality resolved"
    );

    ElectionResult {
        winners,
        vote_counts,
        total_ballots: ballots.len(),
        abstentions,
        tiebreak_applied,
    }
}
