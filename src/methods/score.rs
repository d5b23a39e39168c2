use crate::ballots::{Ballot, ScoreBallot, MAX_SCORE};
use crate::tiebreak::{leaders, settle, TieBreaker};
use crate::types::{
    candidate_ids, ratio, zero_counts, Candidate, CandidateId, ElectionResult, VoteCounts,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Outcome of a score (range voting) election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(flatten)]
    pub outcome: ElectionResult,

    /// Total score per candidate; identical to `outcome.vote_counts`.
    pub score_totals: VoteCounts,

    /// Total divided by the number of non-abstaining ballots.
    pub avg_scores: BTreeMap<CandidateId, f64>,

    /// `MAX_SCORE` times the number of non-abstaining ballots.
    pub max_possible_score: i64,

    /// Total as a percentage of `max_possible_score`.
    pub score_percentages: BTreeMap<CandidateId, f64>,
}

/// Resolves an election by score voting.
///
/// Every non-abstaining ballot adds its score for each known candidate (0 when unscored)
/// to that candidate's total. The highest total wins.
pub fn resolve_score<T>(
    candidates: &[Candidate],
    ballots: &[ScoreBallot],
    tiebreak: &mut T,
) -> ScoreResult
where
    T: TieBreaker + ?Sized,
{
    let ids = candidate_ids(candidates);
    let mut score_totals = zero_counts(&ids);
    let mut abstentions = 0;

    for ballot in ballots {
        if ballot.is_abstention() {
            abstentions += 1;
            continue;
        }
        for (id, total) in score_totals.iter_mut() {
            *total = total.saturating_add(ballot.score(id));
        }
    }

    let non_abstaining = (ballots.len() - abstentions) as i64;
    let max_possible_score = MAX_SCORE * non_abstaining;
    let avg_scores = score_totals
        .iter()
        .map(|(id, &total)| (id.clone(), ratio(total, non_abstaining)))
        .collect();
    let score_percentages = score_totals
        .iter()
        .map(|(id, &total)| (id.clone(), ratio(total, max_possible_score) * 100.0))
        .collect();

    let (winners, tiebreak_applied) = settle(leaders(&ids, &score_totals), tiebreak);
    debug!(
        ballots = ballots.len(),
        abstentions,
        max_possible_score,
        ?winners,
        tiebreak_applied,
        "score resolved"
    );

    ScoreResult {
        outcome: ElectionResult {
            winners,
            vote_counts: score_totals.clone(),
            total_ballots: ballots.len(),
            abstentions,
            tiebreak_applied,
        },
        score_totals,
        avg_scores,
        max_possible_score,
        score_percentages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::fixtures::{candidates, first_listed, panicking};

    #[test]
    fn highest_total_wins_with_metrics() {
        let candidates = candidates(&["alice", "bob", "carol"]);
        let ballots = vec![
            ScoreBallot::new("v1", [("alice", 10), ("bob", 5)]).unwrap(),
            ScoreBallot::new("v2", [("alice", 4), ("bob", 9), ("carol", 2)]).unwrap(),
            ScoreBallot::new("v3", [("bob", 8)]).unwrap(),
            ScoreBallot::abstain("v4"),
        ];

        let result = resolve_score(&candidates, &ballots, &mut panicking);

        assert_eq!(result.outcome.winners, vec!["bob"]);
        assert_eq!(result.score_totals["alice"], 14);
        assert_eq!(result.score_totals["bob"], 22);
        assert_eq!(result.score_totals["carol"], 2);
        assert_eq!(result.outcome.vote_counts, result.score_totals);
        assert_eq!(result.outcome.abstentions, 1);
        assert_eq!(result.max_possible_score, 30);
        assert!((result.avg_scores["alice"] - 14.0 / 3.0).abs() < 1e-9);
        assert!((result.score_percentages["bob"] - 22.0 / 30.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn equal_totals_go_to_tiebreak() {
        let candidates = candidates(&["alice", "bob"]);
        let ballots = vec![
            ScoreBallot::new("v1", [("alice", 7), ("bob", 3)]).unwrap(),
            ScoreBallot::new("v2", [("alice", 3), ("bob", 7)]).unwrap(),
        ];

        let result = resolve_score(&candidates, &ballots, &mut first_listed);

        assert_eq!(result.outcome.winners, vec!["alice"]);
        assert!(result.outcome.tiebreak_applied);
    }

    #[test]
    fn unknown_scores_are_ignored() {
        let candidates = candidates(&["alice", "bob"]);
        let ballots = vec![ScoreBallot::new("v1", [("ghost", 10), ("bob", 1)]).unwrap()];

        let result = resolve_score(&candidates, &ballots, &mut panicking);

        assert_eq!(result.outcome.winners, vec!["bob"]);
        assert!(!result.score_totals.contains_key("ghost"));
        assert!(!result.avg_scores.contains_key("ghost"));
    }

    #[test]
    fn oversized_unchecked_scores_saturate() {
        let candidates = candidates(&["alice", "bob"]);
        let ballots = vec![
            ScoreBallot::new_unchecked("v1", [("alice", i64::MAX)]),
            ScoreBallot::new("v2", [("alice", 1), ("bob", 3)]).unwrap(),
        ];

        let result = resolve_score(&candidates, &ballots, &mut panicking);

        assert_eq!(result.score_totals["alice"], i64::MAX);
        assert_eq!(result.outcome.winners, vec!["alice"]);
    }

    #[test]
    fn no_ballots_gives_zeroed_metrics() {
        let candidates = candidates(&["alice"]);

        let result = resolve_score(&candidates, &[], &mut panicking);

        assert_eq!(result.max_possible_score, 0);
        assert_eq!(result.avg_scores["alice"], 0.0);
        assert_eq!(result.score_percentages["alice"], 0.0);
        assert_eq!(result.outcome.winners, vec!["alice"]);
    }
}
