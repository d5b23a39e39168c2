use super::Ballot;
use crate::error::InvalidRankingError;
use crate::types::{CandidateId, VoterId};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// A ballot ranking candidates in strict order of preference.
///
/// Two views of the same ranking are kept so both access patterns are O(1): the ordered list
/// answers "who is at position k" (IRV, Borda) and the reverse lookup answers "where is
/// candidate c" (pairwise comparisons). For every index `i`,
/// `rank(ranking[i]) == Some(i + 1)`.
///
/// An empty ranking is an abstention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedChoiceBallot {
    voter_id: VoterId,
    ranking: Vec<CandidateId>,
    #[serde(skip)]
    rank_lookup: HashMap<CandidateId, usize>,
}

impl RankedChoiceBallot {
    /// Builds a ballot from a ranking ordered from most to least preferred.
    ///
    /// When `candidates` is given, the ranking must contain exactly those ids.
    ///
    /// # Errors
    /// Fails on duplicate entries, and when `candidates` is given, on missing or unknown
    /// candidates (both are reported together when they occur at once).
    pub fn new(
        voter_id: impl Into<VoterId>,
        ranking: impl IntoIterator<Item = impl Into<CandidateId>>,
        candidates: Option<&[CandidateId]>,
    ) -> Result<Self, InvalidRankingError> {
        let ranking: Vec<CandidateId> = ranking.into_iter().map(Into::into).collect();

        let mut rank_lookup = HashMap::with_capacity(ranking.len());
        let mut duplicates = BTreeSet::new();
        for (index, candidate) in ranking.iter().enumerate() {
            if rank_lookup.insert(candidate.clone(), index + 1).is_some() {
                duplicates.insert(candidate.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(InvalidRankingError::Duplicates {
                duplicates: duplicates.into_iter().collect(),
            });
        }

        if let Some(candidates) = candidates {
            check_complete(&ranking, &rank_lookup, candidates)?;
        }

        Ok(Self {
            voter_id: voter_id.into(),
            ranking,
            rank_lookup,
        })
    }

    pub fn abstain(voter_id: impl Into<VoterId>) -> Self {
        Self {
            voter_id: voter_id.into(),
            ranking: Vec::new(),
            rank_lookup: HashMap::new(),
        }
    }

    /// Candidates from most to least preferred.
    pub fn ranking(&self) -> &[CandidateId] {
        &self.ranking
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// 1-based rank of `candidate`, or `None` if it is not ranked.
    pub fn rank(&self, candidate: &CandidateId) -> Option<usize> {
        self.rank_lookup.get(candidate).copied()
    }

    /// Candidate at 1-based `rank`, or `None` if out of bounds.
    pub fn choice_at_rank(&self, rank: usize) -> Option<&CandidateId> {
        rank.checked_sub(1).and_then(|index| self.ranking.get(index))
    }

    pub fn first_choice(&self) -> Option<&CandidateId> {
        self.ranking.first()
    }

    /// Whether `a` is ranked above `b`; `None` if either is unranked.
    pub fn prefers(&self, a: &CandidateId, b: &CandidateId) -> Option<bool> {
        let rank_a = self.rank(a)?;
        let rank_b = self.rank(b)?;
        Some(rank_a < rank_b)
    }
}

impl Ballot for RankedChoiceBallot {
    fn voter_id(&self) -> &VoterId {
        &self.voter_id
    }

    fn is_abstention(&self) -> bool {
        self.ranking.is_empty()
    }
}

fn check_complete(
    ranking: &[CandidateId],
    rank_lookup: &HashMap<CandidateId, usize>,
    candidates: &[CandidateId],
) -> Result<(), InvalidRankingError> {
    let known: BTreeSet<&CandidateId> = candidates.iter().collect();
    let missing: Vec<CandidateId> = known
        .iter()
        .filter(|candidate| !rank_lookup.contains_key(**candidate))
        .map(|candidate| (*candidate).clone())
        .collect();
    let extra: Vec<CandidateId> = ranking
        .iter()
        .filter(|candidate| !known.contains(candidate))
        .cloned()
        .collect();

    match (missing.is_empty(), extra.is_empty()) {
        (true, true) => Ok(()),
        (false, true) => Err(InvalidRankingError::Incomplete { missing }),
        (true, false) => Err(InvalidRankingError::UnknownCandidates { extra }),
        (false, false) => Err(InvalidRankingError::WrongCandidates { missing, extra }),
    }
}
