//! Resolution methods: how ballots become a winner.
//!
//! Every resolver takes the candidate list, a slice of its ballot variant and a tie-breaker,
//! and returns a result embedding [`ElectionResult`](crate::ElectionResult). Resolvers share
//! the same policies: abstentions are counted but never tallied, ids that are not known
//! candidates are dropped, and the tie-break is only consulted when more than one candidate
//! qualifies for a decision.

mod approval;
mod borda;
mod irv;
mod plurality;
mod quadratic;
mod ranked_pairs;
mod score;

pub use approval::{resolve_approval, ApprovalResult};
pub use borda::{resolve_borda, BordaResult};
pub use irv::{resolve_irv, IrvResult, IrvRound};
pub use plurality::resolve_plurality;
pub use quadratic::{resolve_quadratic, QuadraticResult};
pub use ranked_pairs::{
    resolve_ranked_pairs, PairwiseMatrix, PairwiseVictory, RankedPairsOptions, RankedPairsResult,
};
pub use score::{resolve_score, ScoreResult};
