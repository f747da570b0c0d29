use crate::model::card::{CardValue, format_cards};
use crate::model::hand::{Hand, HandError};
use crate::model::player::PLAYER_COUNT;
use crate::model::rank::{Rank, RankAssignment};
use std::{array, fmt};

/// Pairs that swap cards after taxes: each Dalmuti with the matching Peon.
pub const EXCHANGES: [(Rank, Rank); 2] = [
    (Rank::GreatDalmuti, Rank::GreaterPeon),
    (Rank::LesserDalmuti, Rank::LesserPeon),
];

pub const fn tax_due(rank: Rank) -> usize {
    match rank {
        Rank::GreatDalmuti | Rank::GreaterPeon => 2,
        Rank::LesserDalmuti | Rank::LesserPeon => 1,
        Rank::Merchant => 0,
    }
}

pub const fn may_call_revolution(rank: Rank) -> bool {
    matches!(
        rank,
        Rank::Merchant | Rank::LesserPeon | Rank::GreaterPeon
    )
}

pub fn holds_revolution(hand: &Hand) -> bool {
    hand.jester_count() == 2
}

/// The `n` rightmost non-Jester cards of a canonical hand: its strongest cards.
pub fn pick_best_cards(cards: &[CardValue], n: usize) -> Vec<CardValue> {
    let end = cards.len() - cards.iter().rev().take_while(|c| c.is_jester()).count();
    let start = end.saturating_sub(n);
    cards[start..end].to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxDecision {
    Pay(Vec<CardValue>),
    Revolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxError {
    WrongCount { rank: Rank, expected: usize, actual: usize },
    NotBestCards { expected: Vec<CardValue>, actual: Vec<CardValue> },
    RevolutionNotAllowed(Rank),
    AlreadyRecorded(Rank),
    Incomplete,
    RevolutionPending(Rank),
    Hand(HandError),
}

impl fmt::Display for TaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxError::WrongCount {
                rank,
                expected,
                actual,
            } => write!(f, "{rank} must pay {expected} cards, selected {actual}"),
            TaxError::NotBestCards { expected, actual } => write!(
                f,
                "expected best cards [{}] but selected [{}]",
                format_cards(expected),
                format_cards(actual)
            ),
            TaxError::RevolutionNotAllowed(rank) => {
                write!(f, "{rank} cannot call a revolution with this hand")
            }
            TaxError::AlreadyRecorded(rank) => write!(f, "{rank} has already paid"),
            TaxError::Incomplete => write!(f, "not every rank has settled its taxes"),
            TaxError::RevolutionPending(rank) => {
                write!(f, "{rank} called a revolution; no cards are exchanged")
            }
            TaxError::Hand(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TaxError {}

impl From<HandError> for TaxError {
    fn from(err: HandError) -> Self {
        TaxError::Hand(err)
    }
}

/// Checks the cards Person picked for the tax against their rank.
///
/// Selecting both Jesters calls a revolution from any rank.
pub fn validate_selection(
    rank: Rank,
    hand: &Hand,
    selected: &[CardValue],
) -> Result<TaxDecision, TaxError> {
    if selected.len() == 2 && selected.iter().all(|c| c.is_jester()) {
        return Ok(TaxDecision::Revolution);
    }

    let expected = tax_due(rank);
    if selected.len() != expected {
        return Err(TaxError::WrongCount {
            rank,
            expected,
            actual: selected.len(),
        });
    }

    if rank > Rank::Merchant {
        let mut best = pick_best_cards(hand.cards(), expected);
        let mut actual = selected.to_vec();
        best.sort();
        actual.sort();
        if best != actual {
            return Err(TaxError::NotBestCards {
                expected: best,
                actual,
            });
        }
    }

    Ok(TaxDecision::Pay(selected.to_vec()))
}

/// Everything each rank hands over, indexed by [`Rank`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxLedger {
    payments: [Option<Vec<CardValue>>; PLAYER_COUNT],
    revolution: Option<Rank>,
}

impl TaxLedger {
    pub fn new() -> Self {
        Self {
            payments: array::from_fn(|_| None),
            revolution: None,
        }
    }

    /// Records Person's decision; a revolution only needs both Jesters in hand.
    pub fn record(&mut self, rank: Rank, hand: &Hand, decision: TaxDecision) -> Result<(), TaxError> {
        if self.payments[rank.index()].is_some() {
            return Err(TaxError::AlreadyRecorded(rank));
        }

        let payment = match decision {
            TaxDecision::Revolution => {
                if !holds_revolution(hand) {
                    return Err(TaxError::RevolutionNotAllowed(rank));
                }
                if self.revolution.is_none() {
                    self.revolution = Some(rank);
                }
                vec![CardValue::JESTER; 2]
            }
            TaxDecision::Pay(cards) => {
                if cards.len() != tax_due(rank) {
                    return Err(TaxError::WrongCount {
                        rank,
                        expected: tax_due(rank),
                        actual: cards.len(),
                    });
                }
                hand.clone().remove_all(&cards)?;
                cards
            }
        };

        self.payments[rank.index()] = Some(payment);
        Ok(())
    }

    /// Records a bot's decision. Bots revolt only from Merchant or below.
    pub fn record_bot(
        &mut self,
        rank: Rank,
        hand: &Hand,
        decision: TaxDecision,
    ) -> Result<(), TaxError> {
        if decision == TaxDecision::Revolution && !may_call_revolution(rank) {
            return Err(TaxError::RevolutionNotAllowed(rank));
        }
        self.record(rank, hand, decision)
    }

    pub fn revolution(&self) -> Option<Rank> {
        self.revolution
    }

    pub fn payment(&self, rank: Rank) -> Option<&[CardValue]> {
        self.payments[rank.index()].as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.payments.iter().all(Option::is_some)
    }

    /// Swaps payments between each Dalmuti and Peon pair. All-or-nothing.
    pub fn settle(
        &self,
        hands: &mut [Hand; PLAYER_COUNT],
        ranks: &RankAssignment,
    ) -> Result<(), TaxError> {
        if let Some(rank) = self.revolution {
            return Err(TaxError::RevolutionPending(rank));
        }
        if !self.is_complete() {
            return Err(TaxError::Incomplete);
        }

        let mut updated = hands.clone();
        for (upper, lower) in EXCHANGES {
            let upper_pays = self.payment(upper).unwrap_or_default();
            let lower_pays = self.payment(lower).unwrap_or_default();
            let upper_seat = ranks.holder(upper).index();
            let lower_seat = ranks.holder(lower).index();

            updated[upper_seat].remove_all(upper_pays)?;
            updated[lower_seat].remove_all(lower_pays)?;
            updated[upper_seat].add_all(lower_pays);
            updated[lower_seat].add_all(upper_pays);
        }

        *hands = updated;
        Ok(())
    }
}
