//! Ballot shapes: how voters express preference.
//!
//! Each variant is an immutable value built through a constructor that copies the caller's
//! collections, so later changes to those collections never reach a ballot already built.

mod approval;
mod quadratic;
mod ranked_choice;
mod score;
mod single_choice;

pub use approval::ApprovalBallot;
pub use quadratic::{
    max_votes_for_budget, quadratic_cost, QuadraticBallot, QuadraticRules, DEFAULT_CREDIT_BUDGET,
};
pub use ranked_choice::RankedChoiceBallot;
pub use score::{ScoreBallot, MAX_SCORE, MIN_SCORE};
pub use single_choice::SingleChoiceBallot;

use crate::types::VoterId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability shared by every ballot variant.
pub trait Ballot {
    /// The voter who cast this ballot.
    fn voter_id(&self) -> &VoterId;

    /// Whether the ballot expresses no usable preference.
    fn is_abstention(&self) -> bool;
}

/// Discriminant of the five ballot variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BallotKind {
    SingleChoice,
    Approval,
    RankedChoice,
    Score,
    Quadratic,
}

impl fmt::Display for BallotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BallotKind::SingleChoice => "single-choice",
            BallotKind::Approval => "approval",
            BallotKind::RankedChoice => "ranked-choice",
            BallotKind::Score => "score",
            BallotKind::Quadratic => "quadratic",
        })
    }
}

/// A ballot of any variant, for callers that collect mixed input before choosing a method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AnyBallot {
    SingleChoice(SingleChoiceBallot),
    Approval(ApprovalBallot),
    RankedChoice(RankedChoiceBallot),
    Score(ScoreBallot),
    Quadratic(QuadraticBallot),
}

impl AnyBallot {
    pub fn kind(&self) -> BallotKind {
        match self {
            AnyBallot::SingleChoice(_) => BallotKind::SingleChoice,
            AnyBallot::Approval(_) => BallotKind::Approval,
            AnyBallot::RankedChoice(_) => BallotKind::RankedChoice,
            AnyBallot::Score(_) => BallotKind::Score,
            AnyBallot::Quadratic(_) => BallotKind::Quadratic,
        }
    }

    fn inner(&self) -> &dyn Ballot {
        match self {
            AnyBallot::SingleChoice(ballot) => ballot,
            AnyBallot::Approval(ballot) => ballot,
            AnyBallot::RankedChoice(ballot) => ballot,
            AnyBallot::Score(ballot) => ballot,
            AnyBallot::Quadratic(ballot) => ballot,
        }
    }
}

impl Ballot for AnyBallot {
    fn voter_id(&self) -> &VoterId {
        self.inner().voter_id()
    }

    fn is_abstention(&self) -> bool {
        self.inner().is_abstention()
    }
}

impl From<SingleChoiceBallot> for AnyBallot {
    fn from(ballot: SingleChoiceBallot) -> Self {
        AnyBallot::SingleChoice(ballot)
    }
}

impl From<ApprovalBallot> for AnyBallot {
    fn from(ballot: ApprovalBallot) -> Self {
        AnyBallot::Approval(ballot)
    }
}

impl From<RankedChoiceBallot> for AnyBallot {
    fn from(ballot: RankedChoiceBallot) -> Self {
        AnyBallot::RankedChoice(ballot)
    }
}

impl From<ScoreBallot> for AnyBallot {
    fn from(ballot: ScoreBallot) -> Self {
        AnyBallot::Score(ballot)
    }
}

impl From<QuadraticBallot> for AnyBallot {
    fn from(ballot: QuadraticBallot) -> Self {
        AnyBallot::Quadratic(ballot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_ballot_delegates_to_variant() {
        let ballots: Vec<AnyBallot> = vec![
            SingleChoiceBallot::new("v1", None).into(),
            ApprovalBallot::new("v2", ["alice"]).into(),
            RankedChoiceBallot::abstain("v3").into(),
        ];
        let kinds: Vec<BallotKind> = ballots.iter().map(AnyBallot::kind).collect();
        assert_eq!(
            kinds,
            vec![
                BallotKind::SingleChoice,
                BallotKind::Approval,
                BallotKind::RankedChoice
            ]
        );
        let abstentions: Vec<bool> = ballots.iter().map(Ballot::is_abstention).collect();
        assert_eq!(abstentions, vec![true, false, true]);
        assert_eq!(ballots[1].voter_id().as_str(), "v2");
    }

    #[test]
    fn any_ballot_serializes_with_kind_tag() {
        let ballot: AnyBallot = SingleChoiceBallot::new("v1", Some("alice".into())).into();
        let json = serde_json::to_value(&ballot).unwrap();
        assert_eq!(json["kind"], "single-choice");
        assert_eq!(json["voter_id"], "v1");
        assert_eq!(json["choice"], "alice");
    }
}
