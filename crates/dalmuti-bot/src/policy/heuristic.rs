use super::{Policy, PolicyContext};
use crate::bot::{PlanError, PlayPlanner, TaxPlanner};
use dalmuti_core::model::card::{CardValue, format_cards};
use dalmuti_core::model::tax::TaxDecision;
use tracing::{Level, event};

/// Deterministic heuristic shared by every bot seat.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for HeuristicPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext) -> Result<Vec<CardValue>, PlanError> {
        let choice = PlayPlanner::choose(ctx.hand.cards(), ctx.table)?;
        log_play_decision(ctx, &choice);
        Ok(choice)
    }

    fn choose_tax(&mut self, ctx: &PolicyContext) -> Result<TaxDecision, PlanError> {
        let decision = TaxPlanner::choose(ctx.rank, ctx.hand)?;
        log_tax_decision(ctx, &decision);
        Ok(decision)
    }
}

fn log_play_decision(ctx: &PolicyContext, chosen: &[CardValue]) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let table = ctx.table.map(format_cards).unwrap_or_else(|| "lead".to_string());
    event!(
        target: "dalmuti_bot::play_decision",
        Level::DEBUG,
        player = %ctx.player,
        rank = ctx.rank.abbreviation(),
        hand_size = ctx.hand.len(),
        table = %table,
        chosen = %format_cards(chosen),
    );
}

fn log_tax_decision(ctx: &PolicyContext, decision: &TaxDecision) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let (revolution, cards) = match decision {
        TaxDecision::Revolution => (true, String::new()),
        TaxDecision::Pay(cards) => (false, format_cards(cards)),
    };
    event!(
        target: "dalmuti_bot::tax_decision",
        Level::DEBUG,
        player = %ctx.player,
        rank = ctx.rank.abbreviation(),
        revolution,
        cards = %cards,
    );
}
