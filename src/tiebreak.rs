use crate::types::{CandidateId, VoteCounts};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Trait for resolving ties between candidates.
///
/// Implementors receive a non-empty set of tied candidate ids and must return exactly one of
/// them. Resolvers only call this when more than one candidate qualifies for a decision, and
/// call it at most once per decision.
///
/// Any `FnMut(&[CandidateId]) -> CandidateId` closure is a tie-breaker, which keeps tests
/// deterministic:
///
/// ```
/// use plebiscite::{resolve_plurality, Candidate, CandidateId, SingleChoiceBallot};
///
/// let candidates = vec![Candidate::new("alice", "Alice"), Candidate::new("bob", "Bob")];
/// let ballots = vec![
///     SingleChoiceBallot::new("v1", Some("alice".into())),
///     SingleChoiceBallot::new("v2", Some("bob".into())),
/// ];
/// let mut last = |tied: &[CandidateId]| tied[tied.len() - 1].clone();
/// let result = resolve_plurality(&candidates, &ballots, &mut last);
/// assert_eq!(result.winners, vec!["bob"]);
/// assert!(result.tiebreak_applied);
/// ```
pub trait TieBreaker {
    /// Picks one candidate out of `tied`.
    fn break_tie(&mut self, tied: &[CandidateId]) -> CandidateId;
}

impl<F> TieBreaker for F
where
    F: FnMut(&[CandidateId]) -> CandidateId,
{
    fn break_tie(&mut self, tied: &[CandidateId]) -> CandidateId {
        self(tied)
    }
}

/// Default tie-breaker: selects uniformly at random.
///
/// The generator is owned by the tie-breaker rather than shared, so two resolutions only
/// interfere if they are handed the same instance.
#[derive(Debug, Clone)]
pub struct RandomTieBreaker<R = ThreadRng> {
    rng: R,
}

impl Default for RandomTieBreaker<ThreadRng> {
    fn default() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl RandomTieBreaker<StdRng> {
    /// Creates a reproducible tie-breaker from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomTieBreaker<R> {
    /// Wraps an existing generator.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TieBreaker for RandomTieBreaker<R> {
    /// # Panics
    /// Panics if `tied` is empty.
    fn break_tie(&mut self, tied: &[CandidateId]) -> CandidateId {
        let index = self.rng.gen_range(0..tied.len());
        tied[index].clone()
    }
}

/// Applies the shared tie policy to the set of candidates qualifying for a decision.
///
/// No candidates yields no winner, one candidate is accepted as is, and anything more is
/// handed to `tiebreak` exactly once. The flag reports whether `tiebreak` was invoked.
pub(crate) fn settle<T>(tied: Vec<CandidateId>, tiebreak: &mut T) -> (Vec<CandidateId>, bool)
where
    T: TieBreaker + ?Sized,
{
    match tied.len() {
        0 | 1 => (tied, false),
        _ => {
            let chosen = tiebreak.break_tie(&tied);
            trace!(tied = tied.len(), chosen = %chosen, "tie broken");
            (vec![chosen], true)
        }
    }
}

/// Known candidates sharing the highest total, in election order.
pub(crate) fn leaders(ids: &[CandidateId], totals: &VoteCounts) -> Vec<CandidateId> {
    let Some(best) = ids.iter().filter_map(|id| totals.get(id)).max().copied() else {
        return Vec::new();
    };
    ids.iter()
        .filter(|id| totals.get(*id) == Some(&best))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<CandidateId> {
        names.iter().map(|&name| CandidateId::from(name)).collect()
    }

    #[test]
    fn settle_skips_tiebreak_for_zero_or_one_candidate() {
        let mut calls = 0;
        let mut counting = |tied: &[CandidateId]| {
            calls += 1;
            tied[0].clone()
        };

        let (winners, applied) = settle(Vec::new(), &mut counting);
        assert!(winners.is_empty());
        assert!(!applied);

        let (winners, applied) = settle(ids(&["alice"]), &mut counting);
        assert_eq!(winners, vec!["alice"]);
        assert!(!applied);

        assert_eq!(calls, 0, "tie-break must not run without a tie");
    }

    #[test]
    fn settle_invokes_tiebreak_once_for_real_ties() {
        let mut seen: Vec<Vec<CandidateId>> = Vec::new();
        let mut recording = |tied: &[CandidateId]| {
            seen.push(tied.to_vec());
            tied[1].clone()
        };

        let (winners, applied) = settle(ids(&["alice", "bob", "carol"]), &mut recording);
        assert_eq!(winners, vec!["bob"]);
        assert!(applied);
        assert_eq!(seen, vec![ids(&["alice", "bob", "carol"])]);
    }

    #[test]
    fn seeded_random_tiebreak_is_reproducible_and_picks_a_member() {
        let tied = ids(&["alice", "bob", "carol", "dave"]);
        let mut first = RandomTieBreaker::seeded(7);
        let mut second = RandomTieBreaker::seeded(7);
        for _ in 0..20 {
            let a = first.break_tie(&tied);
            let b = second.break_tie(&tied);
            assert_eq!(a, b);
            assert!(tied.contains(&a));
        }
    }

    #[test]
    fn default_random_tiebreak_covers_every_member() {
        let tied = ids(&["alice", "bob"]);
        let mut tiebreak = RandomTieBreaker::default();
        let picks: Vec<CandidateId> = (0..200).map(|_| tiebreak.break_tie(&tied)).collect();
        assert!(picks.iter().any(|id| id == "alice"));
        assert!(picks.iter().any(|id| id == "bob"));
    }

    #[test]
    fn leaders_follow_election_order_and_ignore_unknown_totals() {
        let order = ids(&["carol", "alice", "bob"]);
        let mut totals = VoteCounts::new();
        totals.insert("alice".into(), 4);
        totals.insert("bob".into(), 2);
        totals.insert("carol".into(), 4);
        totals.insert("ghost".into(), 9);
        assert_eq!(leaders(&order, &totals), ids(&["carol", "alice"]));
        assert!(leaders(&[], &totals).is_empty());
    }
}
