//! Plebiscite: a Rust library for resolving elections. Ballot shapes (how voters express
//! preference) are modelled separately from resolution methods (how ballots become a winner),
//! so the same electorate can be counted under several rules and the outcomes compared.
//!
//! # Features
//! - Five ballot variants: single choice, approval, ranked choice, score and quadratic.
//! - Seven methods: plurality, approval, score, Borda, quadratic, instant-runoff, and
//!   Condorcet with Ranked Pairs completion.
//! - One tie policy for every method, driven by a pluggable [`TieBreaker`].
//! - Serializable results with per-method metrics, IRV round history and the Ranked Pairs graph.
//!
//! # Example
//! ```
//! use plebiscite::{resolve_irv, Candidate, RandomTieBreaker, RankedChoiceBallot};
//!
//! # fn main() -> Result<(), plebiscite::VotingError> {
//! let candidates = vec![
//!     Candidate::new("alice", "Alice"),
//!     Candidate::new("bob", "Bob"),
//!     Candidate::new("carol", "Carol"),
//! ];
//! let ballots = vec![
//!     RankedChoiceBallot::new("v1", ["alice", "bob"], None)?,
//!     RankedChoiceBallot::new("v2", ["alice", "carol"], None)?,
//!     RankedChoiceBallot::new("v3", ["bob", "alice"], None)?,
//!     RankedChoiceBallot::new("v4", ["bob", "carol"], None)?,
//!     RankedChoiceBallot::new("v5", ["carol", "bob"], None)?,
//! ];
//! let result = resolve_irv(&candidates, &ballots, &mut RandomTieBreaker::seeded(1));
//! assert_eq!(result.outcome.winners, vec!["bob"]);
//! assert_eq!(result.winning_round, 2);
//! # Ok(())
//! # }
//! ```

mod ballots;
mod election;
mod error;
mod methods;
mod tiebreak;
mod types;

pub use ballots::{
    max_votes_for_budget, quadratic_cost, AnyBallot, ApprovalBallot, Ballot, BallotKind,
    QuadraticBallot, QuadraticRules, RankedChoiceBallot, ScoreBallot, SingleChoiceBallot,
    DEFAULT_CREDIT_BUDGET, MAX_SCORE, MIN_SCORE,
};
pub use election::{resolve, ElectionMethod, MethodResult};
pub use error::{
    InvalidQuadraticBallotError, InvalidRankingError, InvalidScoreError, VotingError,
};
pub use methods::{
    resolve_approval, resolve_borda, resolve_irv, resolve_plurality, resolve_quadratic,
    resolve_ranked_pairs, resolve_score, ApprovalResult, BordaResult, IrvResult, IrvRound,
    PairwiseMatrix, PairwiseVictory, QuadraticResult, RankedPairsOptions, RankedPairsResult,
    ScoreResult,
};
pub use tiebreak::{RandomTieBreaker, TieBreaker};
pub use types::{Candidate, CandidateId, ElectionResult, VoteCounts, VoterId};
