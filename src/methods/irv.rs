//! Instant-runoff voting.
//!
//! The count is a state machine over the set of remaining candidates. Each round tallies every
//! non-abstaining ballot for its highest-ranked remaining candidate, then either declares a
//! winner or eliminates the weakest candidates and moves to the next round:
//!
//! 1. A candidate holding more than half of the round's active ballots wins. So does the sole
//!    remaining candidate.
//! 2. Otherwise every candidate tied at the lowest tally is eliminated together, as long as at
//!    least one candidate survives.
//! 3. If all remaining candidates are tied at the lowest tally, the tie-break picks the winner
//!    among them and the rest are eliminated; the next round confirms the survivor.

use crate::ballots::{Ballot, RankedChoiceBallot};
use crate::tiebreak::{settle, TieBreaker};
use crate::types::{candidate_ids, zero_counts, Candidate, CandidateId, ElectionResult, VoteCounts};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Tally and eliminations of one IRV round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrvRound {
    /// 1-based, sequential.
    pub round_number: usize,

    /// Tally of the candidates remaining at the start of the round.
    pub vote_counts: VoteCounts,

    /// Ballots with no remaining ranked candidate.
    pub exhausted_ballots: usize,

    /// Ballots counted toward some remaining candidate.
    pub active_ballots: usize,

    /// Candidates removed at the end of the round.
    pub eliminated: Vec<CandidateId>,

    /// Whether the tie-break decided this round's elimination.
    pub elimination_was_tiebreak: bool,
}

/// Outcome of an instant-runoff election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrvResult {
    /// `vote_counts` holds the final round's tally.
    #[serde(flatten)]
    pub outcome: ElectionResult,

    pub rounds: Vec<IrvRound>,

    /// Exhausted ballots in the final round.
    pub total_exhausted: usize,

    /// Round in which the winner was declared, 0 when there is none.
    pub winning_round: usize,
}

/// One round's tally over the remaining candidates.
struct Tally {
    counts: VoteCounts,
    exhausted: usize,
    active: usize,
}

/// Count state between rounds.
struct RunoffCount<'a> {
    ballots: Vec<&'a RankedChoiceBallot>,
    remaining: Vec<CandidateId>,
    rounds: Vec<IrvRound>,
    tiebreak_applied: bool,
}

impl<'a> RunoffCount<'a> {
    fn tally(&self) -> Tally {
        let remaining: HashSet<&CandidateId> = self.remaining.iter().collect();
        let mut counts = zero_counts(&self.remaining);
        let mut exhausted = 0;
        let mut active = 0;

        for ballot in &self.ballots {
            let choice = ballot
                .ranking()
                .iter()
                .find(|candidate| remaining.contains(candidate));
            match choice {
                Some(candidate) => {
                    if let Some(count) = counts.get_mut(candidate) {
                        *count += 1;
                    }
                    active += 1;
                }
                None => exhausted += 1,
            }
        }

        Tally {
            counts,
            exhausted,
            active,
        }
    }

    /// The sole remaining candidate, or one holding a strict majority of active ballots.
    fn winner(&self, tally: &Tally) -> Option<CandidateId> {
        if let [sole] = self.remaining.as_slice() {
            return Some(sole.clone());
        }
        self.remaining
            .iter()
            .find(|id| tally.counts.get(*id).is_some_and(|&count| count * 2 > tally.active as i64))
            .cloned()
    }

    /// Chooses who leaves the count this round.
    fn eliminations<T>(&self, tally: &Tally, tiebreak: &mut T) -> (Vec<CandidateId>, bool)
    where
        T: TieBreaker + ?Sized,
    {
        let lowest_count = self
            .remaining
            .iter()
            .filter_map(|id| tally.counts.get(id))
            .min()
            .copied()
            .unwrap_or(0);
        let lowest: Vec<CandidateId> = self
            .remaining
            .iter()
            .filter(|id| tally.counts.get(*id) == Some(&lowest_count))
            .cloned()
            .collect();

        if lowest.len() < self.remaining.len() {
            return (lowest, false);
        }

        // Everyone is tied: the tie-break names the survivor.
        let (survivor, applied) = settle(self.remaining.clone(), tiebreak);
        let eliminated = self
            .remaining
            .iter()
            .filter(|id| !survivor.contains(id))
            .cloned()
            .collect();
        (eliminated, applied)
    }

    fn record(&mut self, tally: Tally, eliminated: Vec<CandidateId>, was_tiebreak: bool) {
        self.rounds.push(IrvRound {
            round_number: self.rounds.len() + 1,
            vote_counts: tally.counts,
            exhausted_ballots: tally.exhausted,
            active_ballots: tally.active,
            eliminated,
            elimination_was_tiebreak: was_tiebreak,
        });
    }
}

/// Resolves an election by instant-runoff voting.
///
/// Abstaining ballots are excluded from every round and counted once in `abstentions`.
/// Ranked ids that are not known candidates are passed over when finding a ballot's
/// active choice.
pub fn resolve_irv<T>(
    candidates: &[Candidate],
    ballots: &[RankedChoiceBallot],
    tiebreak: &mut T,
) -> IrvResult
where
    T: TieBreaker + ?Sized,
{
    let active_ballots: Vec<&RankedChoiceBallot> =
        ballots.iter().filter(|ballot| !ballot.is_abstention()).collect();
    let abstentions = ballots.len() - active_ballots.len();

    let mut count = RunoffCount {
        ballots: active_ballots,
        remaining: candidate_ids(candidates),
        rounds: Vec::new(),
        tiebreak_applied: false,
    };

    loop {
        if count.remaining.is_empty() {
            debug!(rounds = count.rounds.len(), "irv ended with no candidates left");
            let total_exhausted = count.ballots.len();
            return IrvResult {
                outcome: ElectionResult {
                    winners: Vec::new(),
                    vote_counts: VoteCounts::new(),
                    total_ballots: ballots.len(),
                    abstentions,
                    tiebreak_applied: count.tiebreak_applied,
                },
                rounds: count.rounds,
                total_exhausted,
                winning_round: 0,
            };
        }

        let tally = count.tally();
        debug!(
            round = count.rounds.len() + 1,
            counts = ?tally.counts,
            active = tally.active,
            exhausted = tally.exhausted,
            "irv round tallied"
        );

        if let Some(winner) = count.winner(&tally) {
            let vote_counts = tally.counts.clone();
            let total_exhausted = tally.exhausted;
            count.record(tally, Vec::new(), false);
            let winning_round = count.rounds.len();
            debug!(
                %winner,
                winning_round,
                tiebreak_applied = count.tiebreak_applied,
                "irv resolved"
            );
            return IrvResult {
                outcome: ElectionResult {
                    winners: vec![winner],
                    vote_counts,
                    total_ballots: ballots.len(),
                    abstentions,
                    tiebreak_applied: count.tiebreak_applied,
                },
                rounds: count.rounds,
                total_exhausted,
                winning_round,
            };
        }

        let (eliminated, was_tiebreak) = count.eliminations(&tally, tiebreak);
        debug!(?eliminated, was_tiebreak, "irv elimination");
        count.remaining.retain(|id| !eliminated.contains(id));
        count.tiebreak_applied |= was_tiebreak;
        count.record(tally, eliminated, was_tiebreak);
    }
}
