use crate::model::card::CardValue;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Sorts descending by value, then rotates any leading Jesters to the tail.
pub fn canonicalize(cards: &mut [CardValue]) {
    cards.sort_by(|a, b| b.cmp(a));
    let leading_jesters = cards.iter().take_while(|card| card.is_jester()).count();
    cards.rotate_left(leading_jesters);
}

pub fn is_canonical(cards: &[CardValue]) -> bool {
    let split = cards
        .iter()
        .position(|card| card.is_jester())
        .unwrap_or(cards.len());
    let (ordinary, jesters) = cards.split_at(split);
    ordinary.windows(2).all(|pair| pair[0] >= pair[1]) && jesters.iter().all(|c| c.is_jester())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandError {
    CardNotInHand(CardValue),
}

impl fmt::Display for HandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandError::CardNotInHand(card) => write!(f, "card {card} is not in hand"),
        }
    }
}

impl std::error::Error for HandError {}

/// A player's cards, always kept in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<CardValue>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<CardValue>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add_all(&mut self, cards: &[CardValue]) {
        self.cards.extend_from_slice(cards);
        self.sort();
    }

    /// Removes every card of `cards` (as a multiset) or nothing at all.
    pub fn remove_all(&mut self, cards: &[CardValue]) -> Result<(), HandError> {
        let mut remaining = self.cards.clone();
        for card in cards {
            match remaining.iter().position(|c| c == card) {
                Some(index) => {
                    remaining.remove(index);
                }
                None => return Err(HandError::CardNotInHand(*card)),
            }
        }
        self.cards = remaining;
        Ok(())
    }

    pub fn count(&self, card: CardValue) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    pub fn jester_count(&self) -> usize {
        self.count(CardValue::JESTER)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardValue> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[CardValue] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<CardValue> {
        self.cards.get(index).copied()
    }

    pub fn is_canonical(&self) -> bool {
        is_canonical(&self.cards)
    }

    pub fn penalty_total(&self) -> u32 {
        self.cards.iter().map(|card| card.penalty()).sum()
    }

    fn sort(&mut self) {
        canonicalize(&mut self.cards);
    }
}
