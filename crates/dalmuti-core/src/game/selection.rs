use crate::model::card::CardValue;
use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::OutOfRange { index, len } => {
                write!(f, "card index {index} is outside a hand of {len}")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Indices into Person's canonical hand that are currently picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    indices: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the cards matching `cards` as a multiset, or `None` if the hand lacks one.
    pub fn for_cards(hand: &Hand, cards: &[CardValue]) -> Option<Self> {
        let mut indices = BTreeSet::new();
        for card in cards {
            let index = hand
                .iter()
                .enumerate()
                .position(|(i, c)| c == card && !indices.contains(&i))?;
            indices.insert(index);
        }
        Some(Self { indices })
    }

    /// Flips the card at `index`; returns whether it is now selected.
    pub fn toggle(&mut self, index: usize, hand: &Hand) -> Result<bool, SelectionError> {
        if index >= hand.len() {
            return Err(SelectionError::OutOfRange {
                index,
                len: hand.len(),
            });
        }
        if self.indices.remove(&index) {
            Ok(false)
        } else {
            self.indices.insert(index);
            Ok(true)
        }
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Selected cards in hand order; stale indices are skipped.
    pub fn cards(&self, hand: &Hand) -> Vec<CardValue> {
        self.indices.iter().filter_map(|&i| hand.get(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Selection, SelectionError};
    use crate::model::card::CardValue;
    use crate::model::hand::Hand;

    fn hand(values: &[u8]) -> Hand {
        Hand::with_cards(CardValue::parse_all(values).unwrap())
    }

    #[test]
    fn toggle_flips_membership() {
        let h = hand(&[9, 4, 4, 13]);
        let mut selection = Selection::new();
        assert_eq!(selection.toggle(3, &h), Ok(true));
        assert_eq!(selection.toggle(1, &h), Ok(true));
        assert_eq!(selection.cards(&h), CardValue::parse_all(&[4, 13]).unwrap());
        assert_eq!(selection.toggle(3, &h), Ok(false));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn out_of_range_is_reported() {
        let h = hand(&[1]);
        let mut selection = Selection::new();
        assert_eq!(
            selection.toggle(1, &h),
            Err(SelectionError::OutOfRange { index: 1, len: 1 })
        );
        assert!(selection.is_empty());
    }

    #[test]
    fn for_cards_uses_distinct_indices() {
        let h = hand(&[9, 4, 4, 13]);
        let selection = Selection::for_cards(&h, &CardValue::parse_all(&[4, 4, 13]).unwrap()).unwrap();
        assert_eq!(selection.indices().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(Selection::for_cards(&h, &CardValue::parse_all(&[9, 9]).unwrap()).is_none());
    }
}
