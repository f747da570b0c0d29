use super::PlanError;
use dalmuti_core::model::card::CardValue;
use dalmuti_core::model::hand::Hand;
use dalmuti_core::model::rank::Rank;
use dalmuti_core::model::tax::{
    TaxDecision, holds_revolution, may_call_revolution, pick_best_cards, tax_due,
};

/// Highest value from 12 down to 6 held exactly once, else the hand's first card.
pub fn pick_highest_single(cards: &[CardValue]) -> Result<CardValue, PlanError> {
    CardValue::ordinary_descending()
        .take_while(|value| value.value() >= 6)
        .find(|value| cards.iter().filter(|&c| c == value).count() == 1)
        .or_else(|| cards.first().copied())
        .ok_or(PlanError::EmptyHand)
}

pub struct TaxPlanner;

impl TaxPlanner {
    pub fn choose(rank: Rank, hand: &Hand) -> Result<TaxDecision, PlanError> {
        if may_call_revolution(rank) && holds_revolution(hand) {
            return Ok(TaxDecision::Revolution);
        }

        let due = tax_due(rank);
        let payment = match rank {
            Rank::GreatDalmuti | Rank::LesserDalmuti => {
                let mut remaining = hand.clone();
                let mut payment = Vec::with_capacity(due);
                for _ in 0..due {
                    let card = pick_highest_single(remaining.cards())?;
                    remaining
                        .remove_all(&[card])
                        .map_err(|_| PlanError::EmptyHand)?;
                    payment.push(card);
                }
                payment
            }
            Rank::Merchant => Vec::new(),
            Rank::LesserPeon | Rank::GreaterPeon => pick_best_cards(hand.cards(), due),
        };
        Ok(TaxDecision::Pay(payment))
    }
}
