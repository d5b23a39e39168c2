use crate::ballots::{Ballot, RankedChoiceBallot};
use crate::tiebreak::{leaders, settle, TieBreaker};
use crate::types::{candidate_ids, ratio, zero_counts, Candidate, ElectionResult, VoteCounts};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of a Borda count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BordaResult {
    #[serde(flatten)]
    pub outcome: ElectionResult,

    /// Points per candidate; identical to `outcome.vote_counts`.
    pub point_totals: VoteCounts,

    /// Points awarded to a first choice: `n - 1` for `n` candidates.
    pub max_points_per_ballot: i64,

    /// Sum of all totals divided by the number of candidates.
    pub avg_points_per_candidate: f64,
}

/// Resolves an election by Borda count.
///
/// With `n` candidates the ranking position `p` (0 = most preferred) is worth `(n - 1) - p`
/// points. Ranking entries for unknown ids are skipped but still occupy their position, so a
/// known candidate ranked below position `n - 1` earns negative points.
pub fn resolve_borda<T>(
    candidates: &[Candidate],
    ballots: &[RankedChoiceBallot],
    tiebreak: &mut T,
) -> BordaResult
where
    T: TieBreaker + ?Sized,
{
    let ids = candidate_ids(candidates);
    let max_points = (ids.len() as i64 - 1).max(0);
    let mut point_totals = zero_counts(&ids);
    let mut abstentions = 0;

    for ballot in ballots {
        if ballot.is_abstention() {
            abstentions += 1;
            continue;
        }
        for (position, candidate) in ballot.ranking().iter().enumerate() {
            if let Some(total) = point_totals.get_mut(candidate) {
                *total += max_points - position as i64;
            }
        }
    }

    let avg_points_per_candidate = ratio(point_totals.values().sum(), ids.len() as i64);

    let (winners, tiebreak_applied) = settle(leaders(&ids, &point_totals), tiebreak);
    debug!(
        ballots = ballots.len(),
        abstentions,
        ?winners,
        tiebreak_applied,
        "borda resolved"
    );

    BordaResult {
        outcome: ElectionResult {
            winners,
            vote_counts: point_totals.clone(),
            total_ballots: ballots.len(),
            abstentions,
            tiebreak_applied,
        },
        point_totals,
        max_points_per_ballot: max_points,
        avg_points_per_candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::fixtures::{candidates, first_listed, panicking, ranked};
    use quickcheck_macros::quickcheck;

    #[test]
    fn positions_are_weighted_from_the_top() {
        let candidates = candidates(&["alice", "bob", "carol"]);
        let ballots = vec![
            ranked("v1", &["alice", "bob", "carol"]),
            ranked("v2", &["bob", "alice", "carol"]),
            ranked("v3", &["bob", "carol", "alice"]),
        ];

        let result = resolve_borda(&candidates, &ballots, &mut panicking);

        assert_eq!(result.outcome.winners, vec!["bob"]);
        assert_eq!(result.point_totals["alice"], 3);
        assert_eq!(result.point_totals["bob"], 5);
        assert_eq!(result.point_totals["carol"], 1);
        assert_eq!(result.max_points_per_ballot, 2);
        assert!((result.avg_points_per_candidate - 3.0).abs() < 1e-9);
    }

    #[test]
    fn abstentions_contribute_nothing() {
        let candidates = candidates(&["alice", "bob"]);
        let ballots = vec![
            ranked("v1", &["alice", "bob"]),
            RankedChoiceBallot::abstain("v2"),
        ];

        let result = resolve_borda(&candidates, &ballots, &mut panicking);

        assert_eq!(result.outcome.abstentions, 1);
        assert_eq!(result.point_totals["alice"], 1);
        assert_eq!(result.point_totals["bob"], 0);
    }

    #[test]
    fn unknown_entries_are_skipped() {
        let candidates = candidates(&["alice", "bob"]);
        let ballots = vec![ranked("v1", &["ghost", "bob", "alice"])];

        let result = resolve_borda(&candidates, &ballots, &mut panicking);

        assert!(!result.point_totals.contains_key("ghost"));
        assert_eq!(result.point_totals["bob"], 0);
        assert_eq!(result.point_totals["alice"], -1);
        assert_eq!(result.outcome.winners, vec!["bob"]);
        assert!(!result.outcome.tiebreak_applied);
    }

    #[test]
    fn positions_pushed_down_by_unknown_ids_go_negative() {
        let candidates = candidates(&["a", "b"]);
        let ballots = vec![
            ranked("v1", &["b", "a"]),
            ranked("v2", &["g1", "a", "g2", "g3", "b"]),
        ];

        let result = resolve_borda(&candidates, &ballots, &mut panicking);

        assert_eq!(result.point_totals["a"], 0);
        assert_eq!(result.point_totals["b"], -2);
        assert_eq!(result.outcome.winners, vec!["a"]);
        assert!((result.avg_points_per_candidate + 1.0).abs() < 1e-9);
    }

    #[test]
    fn no_candidates() {
        let result = resolve_borda(&[], &[ranked("v1", &["alice"])], &mut panicking);

        assert!(result.outcome.winners.is_empty());
        assert_eq!(result.max_points_per_ballot, 0);
        assert_eq!(result.avg_points_per_candidate, 0.0);
    }

    #[quickcheck]
    fn complete_ballot_awards_triangular_total(n: u8, rotation: usize) -> bool {
        let n = usize::from(n % 12);
        let names: Vec<String> = (0..n).map(|i| format!("c{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut order = refs.clone();
        if n > 0 {
            order.rotate_left(rotation % n);
        }
        let candidates = candidates(&refs);
        let ballots = vec![ranked("v", &order)];

        let result = resolve_borda(&candidates, &ballots, &mut first_listed);

        let awarded: i64 = result.point_totals.values().sum();
        let n = n as i64;
        n == 0 || awarded == n * (n - 1) / 2
    }
}
