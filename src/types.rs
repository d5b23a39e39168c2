use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Opaque identifier of a candidate, unique within an election.
///
/// Candidate identity is by id only; two [`Candidate`]s with the same id are the same candidate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for CandidateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CandidateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CandidateId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CandidateId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Opaque identifier of the voter who cast a ballot.
///
/// Not required to be unique and never used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoterId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for VoterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A candidate or option that can be voted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier used by ballots to refer to this candidate.
    pub id: CandidateId,

    /// Display name.
    pub name: String,
}

impl Candidate {
    pub fn new(id: impl Into<CandidateId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Per-candidate totals. The meaning of the number depends on the method
/// (votes, approvals, points, net quadratic votes or pairwise wins).
pub type VoteCounts = BTreeMap<CandidateId, i64>;

/// Outcome fields shared by every resolution method.
///
/// Method-specific results embed this record and add their own metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionResult {
    /// Winning candidates; empty when no winner could be determined.
    pub winners: Vec<CandidateId>,

    /// Totals for every known candidate.
    pub vote_counts: VoteCounts,

    /// Number of ballots handed to the resolver.
    pub total_ballots: usize,

    /// Number of ballots that expressed no usable preference.
    pub abstentions: usize,

    /// Whether the tie-break function decided the outcome.
    pub tiebreak_applied: bool,
}

impl ElectionResult {
    /// The single winner, if any.
    pub fn winner(&self) -> Option<&CandidateId> {
        self.winners.first()
    }
}

/// Candidate ids in election order with duplicates removed.
pub(crate) fn candidate_ids(candidates: &[Candidate]) -> Vec<CandidateId> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .iter()
        .filter(|candidate| seen.insert(&candidate.id))
        .map(|candidate| candidate.id.clone())
        .collect()
}

/// Zeroed totals for every known candidate.
pub(crate) fn zero_counts(ids: &[CandidateId]) -> VoteCounts {
    ids.iter().map(|id| (id.clone(), 0)).collect()
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub(crate) fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
