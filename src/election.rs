use crate::ballots::{AnyBallot, Ballot, BallotKind};
use crate::error::VotingError;
use crate::methods::{
    resolve_approval, resolve_borda, resolve_irv, resolve_plurality, resolve_quadratic,
    resolve_ranked_pairs, resolve_score, ApprovalResult, BordaResult, IrvResult, QuadraticResult,
    RankedPairsOptions, RankedPairsResult, ScoreResult,
};
use crate::tiebreak::TieBreaker;
use crate::types::{Candidate, ElectionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The seven resolution methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElectionMethod {
    Plurality,
    Approval,
    Score,
    Borda,
    Quadratic,
    InstantRunoff,
    RankedPairs,
}

impl ElectionMethod {
    pub const ALL: [ElectionMethod; 7] = [
        ElectionMethod::Plurality,
        ElectionMethod::Approval,
        ElectionMethod::Score,
        ElectionMethod::Borda,
        ElectionMethod::Quadratic,
        ElectionMethod::InstantRunoff,
        ElectionMethod::RankedPairs,
    ];

    /// The ballot variant this method consumes.
    pub fn ballot_kind(self) -> BallotKind {
        match self {
            ElectionMethod::Plurality => BallotKind::SingleChoice,
            ElectionMethod::Approval => BallotKind::Approval,
            ElectionMethod::Score => BallotKind::Score,
            ElectionMethod::Quadratic => BallotKind::Quadratic,
            ElectionMethod::Borda | ElectionMethod::InstantRunoff | ElectionMethod::RankedPairs => {
                BallotKind::RankedChoice
            }
        }
    }

    fn name(self) -> &'static str {
        match self {
            ElectionMethod::Plurality => "plurality",
            ElectionMethod::Approval => "approval",
            ElectionMethod::Score => "score",
            ElectionMethod::Borda => "borda",
            ElectionMethod::Quadratic => "quadratic",
            ElectionMethod::InstantRunoff => "instant-runoff",
            ElectionMethod::RankedPairs => "ranked-pairs",
        }
    }
}

impl fmt::Display for ElectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElectionMethod {
    type Err = VotingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElectionMethod::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| VotingError::UnknownMethod { name: s.to_owned() })
    }
}

/// Result of any method, as returned by [`resolve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum MethodResult {
    Plurality(ElectionResult),
    Approval(ApprovalResult),
    Score(ScoreResult),
    Borda(BordaResult),
    Quadratic(QuadraticResult),
    InstantRunoff(IrvResult),
    RankedPairs(RankedPairsResult),
}

impl MethodResult {
    pub fn method(&self) -> ElectionMethod {
        match self {
            MethodResult::Plurality(_) => ElectionMethod::Plurality,
            MethodResult::Approval(_) => ElectionMethod::Approval,
            MethodResult::Score(_) => ElectionMethod::Score,
            MethodResult::Borda(_) => ElectionMethod::Borda,
            MethodResult::Quadratic(_) => ElectionMethod::Quadratic,
            MethodResult::InstantRunoff(_) => ElectionMethod::InstantRunoff,
            MethodResult::RankedPairs(_) => ElectionMethod::RankedPairs,
        }
    }

    /// The fields every method reports.
    pub fn outcome(&self) -> &ElectionResult {
        match self {
            MethodResult::Plurality(result) => result,
            MethodResult::Approval(result) => &result.outcome,
            MethodResult::Score(result) => &result.outcome,
            MethodResult::Borda(result) => &result.outcome,
            MethodResult::Quadratic(result) => &result.outcome,
            MethodResult::InstantRunoff(result) => &result.outcome,
            MethodResult::RankedPairs(result) => &result.outcome,
        }
    }
}

/// Resolves `ballots` with `method`.
///
/// Ranked Pairs runs with [`RankedPairsOptions::default`]; call
/// [`resolve_ranked_pairs`] directly for other settings.
///
/// # Errors
/// Returns [`VotingError::BallotKindMismatch`] for the first ballot whose variant is not the
/// one `method` consumes. Nothing is tallied in that case.
pub fn resolve<T>(
    method: ElectionMethod,
    candidates: &[Candidate],
    ballots: &[AnyBallot],
    tiebreak: &mut T,
) -> Result<MethodResult, VotingError>
where
    T: TieBreaker + ?Sized,
{
    debug!(%method, candidates = candidates.len(), ballots = ballots.len(), "resolving election");

    let result = match method {
        ElectionMethod::Plurality => {
            let ballots = typed_ballots(method, ballots, |ballot| match ballot {
                AnyBallot::SingleChoice(ballot) => Some(ballot),
                _ => None,
            })?;
            MethodResult::Plurality(resolve_plurality(candidates, &ballots, tiebreak))
        }
        ElectionMethod::Approval => {
            let ballots = typed_ballots(method, ballots, |ballot| match ballot {
                AnyBallot::Approval(ballot) => Some(ballot),
                _ => None,
            })?;
            MethodResult::Approval(resolve_approval(candidates, &ballots, tiebreak))
        }
        ElectionMethod::Score => {
            let ballots = typed_ballots(method, ballots, |ballot| match ballot {
                AnyBallot::Score(ballot) => Some(ballot),
                _ => None,
            })?;
            MethodResult::Score(resolve_score(candidates, &ballots, tiebreak))
        }
        ElectionMethod::Quadratic => {
            let ballots = typed_ballots(method, ballots, |ballot| match ballot {
                AnyBallot::Quadratic(ballot) => Some(ballot),
                _ => None,
            })?;
            MethodResult::Quadratic(resolve_quadratic(candidates, &ballots, tiebreak))
        }
        ElectionMethod::Borda | ElectionMethod::InstantRunoff | ElectionMethod::RankedPairs => {
            let ballots = typed_ballots(method, ballots, |ballot| match ballot {
                AnyBallot::RankedChoice(ballot) => Some(ballot),
                _ => None,
            })?;
            match method {
                ElectionMethod::Borda => {
                    MethodResult::Borda(resolve_borda(candidates, &ballots, tiebreak))
                }
                ElectionMethod::InstantRunoff => {
                    MethodResult::InstantRunoff(resolve_irv(candidates, &ballots, tiebreak))
                }
                _ => MethodResult::RankedPairs(resolve_ranked_pairs(
                    candidates,
                    &ballots,
                    tiebreak,
                    RankedPairsOptions::default(),
                )),
            }
        }
    };

    Ok(result)
}

/// Clones out the ballots of the variant `method` consumes, failing on the first other variant.
fn typed_ballots<B: Clone>(
    method: ElectionMethod,
    ballots: &[AnyBallot],
    extract: impl Fn(&AnyBallot) -> Option<&B>,
) -> Result<Vec<B>, VotingError> {
    ballots
        .iter()
        .map(|ballot| {
            extract(ballot)
                .cloned()
                .ok_or_else(|| VotingError::BallotKindMismatch {
                    method,
                    expected: method.ballot_kind(),
                    found: ballot.kind(),
                    voter_id: ballot.voter_id().clone(),
                })
        })
        .collect()
}
