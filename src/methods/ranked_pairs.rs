//! Condorcet method with Ranked Pairs completion.
//!
//! A candidate who beats every opponent head to head wins outright. Otherwise every pairwise
//! victory is considered from strongest to weakest and locked into a "beats" graph unless it
//! would close a cycle; the candidate nobody beats in the locked graph wins.

use crate::ballots::{Ballot, RankedChoiceBallot};
use crate::tiebreak::{settle, TieBreaker};
use crate::types::{candidate_ids, Candidate, CandidateId, ElectionResult, VoteCounts};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Head-to-head preference counts.
///
/// `get(a, b)` is the number of non-abstaining voters ranking `a` above `b`. Pairs where a
/// ballot ranks only one of the two candidates are not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairwiseMatrix(BTreeMap<CandidateId, BTreeMap<CandidateId, i64>>);

impl PairwiseMatrix {
    /// Counts every unordered pair of known candidates across `ballots`.
    pub fn build(candidates: &[Candidate], ballots: &[RankedChoiceBallot]) -> Self {
        let ids = candidate_ids(candidates);
        let mut rows: BTreeMap<CandidateId, BTreeMap<CandidateId, i64>> = ids
            .iter()
            .map(|a| {
                let row = ids.iter().filter(|b| *b != a).map(|b| (b.clone(), 0)).collect();
                (a.clone(), row)
            })
            .collect();

        for ballot in ballots.iter().filter(|ballot| !ballot.is_abstention()) {
            for (i, a) in ids.iter().enumerate() {
                for b in &ids[i + 1..] {
                    let (winner, loser) = match ballot.prefers(a, b) {
                        Some(true) => (a, b),
                        Some(false) => (b, a),
                        None => continue,
                    };
                    if let Some(count) = rows.get_mut(winner).and_then(|row| row.get_mut(loser)) {
                        *count += 1;
                    }
                }
            }
        }

        Self(rows)
    }

    /// Voters preferring `a` over `b`; 0 for pairs the matrix does not cover.
    pub fn get(&self, a: &CandidateId, b: &CandidateId) -> i64 {
        self.0
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// `get(a, b) - get(b, a)`; positive when `a` beats `b`.
    pub fn margin(&self, a: &CandidateId, b: &CandidateId) -> i64 {
        self.get(a, b) - self.get(b, a)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of opponents in `ids` that `candidate` beats by a positive margin.
    fn wins(&self, candidate: &CandidateId, ids: &[CandidateId]) -> i64 {
        ids.iter()
            .filter(|opponent| *opponent != candidate && self.margin(candidate, opponent) > 0)
            .count() as i64
    }
}

/// A pairwise victory that was locked or skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseVictory {
    pub winner: CandidateId,
    pub loser: CandidateId,
    pub margin: i64,
}

/// Settings for [`resolve_ranked_pairs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankedPairsOptions {
    /// A precomputed matrix to use instead of building one from the ballots.
    pub pairwise_matrix: Option<PairwiseMatrix>,

    /// Whether to return the matrix in the result; an empty matrix is returned otherwise.
    pub include_pairwise_matrix: bool,

    /// Seed for the shuffle that orders victories of equal strength. `None` draws from the
    /// thread-local generator.
    pub shuffle_seed: Option<u64>,
}

impl Default for RankedPairsOptions {
    fn default() -> Self {
        Self {
            pairwise_matrix: None,
            include_pairwise_matrix: true,
            shuffle_seed: None,
        }
    }
}

/// Outcome of a Ranked Pairs election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPairsResult {
    /// `vote_counts` holds each candidate's number of pairwise wins.
    #[serde(flatten)]
    pub outcome: ElectionResult,

    pub pairwise_matrix: PairwiseMatrix,

    pub had_condorcet_winner: bool,

    /// Victories added to the graph, in the order they were considered.
    pub locked_victories: Vec<PairwiseVictory>,

    /// Victories dropped because they would have closed a cycle.
    pub skipped_victories: Vec<PairwiseVictory>,
}

struct Victory {
    winner: CandidateId,
    loser: CandidateId,
    margin: i64,
    winning_votes: i64,
}

impl From<Victory> for PairwiseVictory {
    fn from(victory: Victory) -> Self {
        Self {
            winner: victory.winner,
            loser: victory.loser,
            margin: victory.margin,
        }
    }
}

fn condorcet_winner(ids: &[CandidateId], matrix: &PairwiseMatrix) -> Option<CandidateId> {
    ids.iter()
        .find(|candidate| {
            ids.iter()
                .filter(|opponent| opponent != candidate)
                .all(|opponent| matrix.margin(candidate, opponent) > 0)
        })
        .cloned()
}

/// Positive-margin victories, strongest first. Equal-strength victories are in shuffled order.
fn sorted_victories(
    ids: &[CandidateId],
    matrix: &PairwiseMatrix,
    seed: Option<u64>,
) -> Vec<Victory> {
    let mut victories = Vec::new();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let margin = matrix.margin(a, b);
            let (winner, loser) = match margin {
                m if m > 0 => (a, b),
                m if m < 0 => (b, a),
                _ => continue,
            };
            victories.push(Victory {
                winner: winner.clone(),
                loser: loser.clone(),
                margin: margin.abs(),
                winning_votes: matrix.get(winner, loser),
            });
        }
    }

    match seed {
        Some(seed) => victories.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => victories.shuffle(&mut rand::thread_rng()),
    }
    // Stable, so the shuffle only decides among equal keys.
    victories.sort_by_key(|victory| Reverse((victory.margin, victory.winning_votes)));
    victories
}

/// Whether `to` is reachable from `from` along locked edges.
fn reaches(
    graph: &BTreeMap<CandidateId, BTreeSet<CandidateId>>,
    from: &CandidateId,
    to: &CandidateId,
) -> bool {
    let mut visited: HashSet<&CandidateId> = HashSet::new();
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if !visited.insert(node) {
            continue;
        }
        if let Some(beaten) = graph.get(node) {
            stack.extend(beaten.iter());
        }
    }
    false
}

/// Resolves an election by Condorcet's method, falling back to Ranked Pairs.
///
/// Ranked ids that are not known candidates never enter the matrix. `vote_counts` reports
/// pairwise wins rather than first choices. The tie-break is consulted only when the locked
/// graph has several (or no) unbeaten candidates.
pub fn resolve_ranked_pairs<T>(
    candidates: &[Candidate],
    ballots: &[RankedChoiceBallot],
    tiebreak: &mut T,
    options: RankedPairsOptions,
) -> RankedPairsResult
where
    T: TieBreaker + ?Sized,
{
    let ids = candidate_ids(candidates);
    let abstentions = ballots.iter().filter(|ballot| ballot.is_abstention()).count();
    let outcome = |winners: Vec<CandidateId>, vote_counts: VoteCounts, tiebreak_applied: bool| {
        ElectionResult {
            winners,
            vote_counts,
            total_ballots: ballots.len(),
            abstentions,
            tiebreak_applied,
        }
    };

    match ids.as_slice() {
        [] => {
            return RankedPairsResult {
                outcome: outcome(Vec::new(), VoteCounts::new(), false),
                pairwise_matrix: PairwiseMatrix::default(),
                had_condorcet_winner: false,
                locked_victories: Vec::new(),
                skipped_victories: Vec::new(),
            };
        }
        [sole] => {
            let mut matrix = BTreeMap::new();
            matrix.insert(sole.clone(), BTreeMap::new());
            return RankedPairsResult {
                outcome: outcome(vec![sole.clone()], VoteCounts::from([(sole.clone(), 0)]), false),
                pairwise_matrix: PairwiseMatrix(matrix),
                had_condorcet_winner: true,
                locked_victories: Vec::new(),
                skipped_victories: Vec::new(),
            };
        }
        _ => {}
    }

    let matrix = options
        .pairwise_matrix
        .unwrap_or_else(|| PairwiseMatrix::build(candidates, ballots));
    let vote_counts: VoteCounts = ids
        .iter()
        .map(|id| (id.clone(), matrix.wins(id, &ids)))
        .collect();
    let reported_matrix = |matrix: PairwiseMatrix| {
        if options.include_pairwise_matrix {
            matrix
        } else {
            PairwiseMatrix::default()
        }
    };

    if let Some(winner) = condorcet_winner(&ids, &matrix) {
        debug!(%winner, ballots = ballots.len(), abstentions, "condorcet winner found");
        return RankedPairsResult {
            outcome: outcome(vec![winner], vote_counts, false),
            pairwise_matrix: reported_matrix(matrix),
            had_condorcet_winner: true,
            locked_victories: Vec::new(),
            skipped_victories: Vec::new(),
        };
    }

    let mut graph: BTreeMap<CandidateId, BTreeSet<CandidateId>> =
        ids.iter().map(|id| (id.clone(), BTreeSet::new())).collect();
    let mut locked_victories = Vec::new();
    let mut skipped_victories = Vec::new();

    for victory in sorted_victories(&ids, &matrix, options.shuffle_seed) {
        if reaches(&graph, &victory.loser, &victory.winner) {
            debug!(
                winner = %victory.winner,
                loser = %victory.loser,
                margin = victory.margin,
                "skipped victory"
            );
            skipped_victories.push(PairwiseVictory::from(victory));
            continue;
        }
        debug!(
            winner = %victory.winner,
            loser = %victory.loser,
            margin = victory.margin,
            "locked victory"
        );
        if let Some(beaten) = graph.get_mut(&victory.winner) {
            beaten.insert(victory.loser.clone());
        }
        locked_victories.push(PairwiseVictory::from(victory));
    }

    let beaten: HashSet<&CandidateId> = graph.values().flatten().collect();
    let sources: Vec<CandidateId> = ids.iter().filter(|id| !beaten.contains(id)).cloned().collect();
    let (winners, tiebreak_applied) = if sources.is_empty() {
        settle(ids.clone(), tiebreak)
    } else {
        settle(sources, tiebreak)
    };
    debug!(
        ?winners,
        locked = locked_victories.len(),
        skipped = skipped_victories.len(),
        tiebreak_applied,
        "ranked pairs resolved"
    );

    RankedPairsResult {
        outcome: outcome(winners, vote_counts, tiebreak_applied),
        pairwise_matrix: reported_matrix(matrix),
        had_condorcet_winner: false,
        locked_victories,
        skipped_victories,
    }
}
