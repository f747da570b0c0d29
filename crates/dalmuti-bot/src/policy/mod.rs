mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::PlanError;
use dalmuti_core::model::card::CardValue;
use dalmuti_core::model::hand::Hand;
use dalmuti_core::model::player::PlayerId;
use dalmuti_core::model::rank::Rank;
use dalmuti_core::model::tax::TaxDecision;

/// What a player can see when it is asked to decide.
pub struct PolicyContext<'a> {
    pub player: PlayerId,
    pub rank: Rank,
    pub hand: &'a Hand,
    /// Last non-pass play of the round; `None` is a free lead.
    pub table: Option<&'a [CardValue]>,
}

/// Decision-making seam for computer-controlled seats.
pub trait Policy: Send {
    /// Cards to play this turn; an empty vector passes.
    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<Vec<CardValue>, PlanError>;

    fn choose_tax(&mut self, ctx: &PolicyContext) -> Result<TaxDecision, PlanError>;
}
