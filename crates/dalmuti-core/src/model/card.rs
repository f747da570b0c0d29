use core::fmt;
use serde::{Deserialize, Serialize};

/// Face value of a card. Lower values beat higher ones; 13 is the Jester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CardValue(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCardValue(pub u8);

impl fmt::Display for InvalidCardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card value {} is outside 1..=13", self.0)
    }
}

impl std::error::Error for InvalidCardValue {}

impl CardValue {
    pub const JESTER: CardValue = CardValue(13);
    pub const HIGHEST_ORDINARY: u8 = 12;
    /// Ceiling used when nothing is on the table; every value is below it.
    pub const FREE_LEAD_CEILING: u8 = 14;

    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 13 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_jester(self) -> bool {
        self.0 == Self::JESTER.0
    }

    /// Points a card left in a bot's hand is worth: `(14 - v)^2`.
    pub const fn penalty(self) -> u32 {
        let distance = (Self::FREE_LEAD_CEILING - self.0) as u32;
        distance * distance
    }

    /// Ordinary values from weakest (12) to strongest (1).
    pub fn ordinary_descending() -> impl Iterator<Item = CardValue> {
        (1..=Self::HIGHEST_ORDINARY).rev().map(CardValue)
    }

    pub fn parse_all(values: &[u8]) -> Result<Vec<CardValue>, InvalidCardValue> {
        values.iter().map(|&v| CardValue::try_from(v)).collect()
    }
}

impl TryFrom<u8> for CardValue {
    type Error = InvalidCardValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CardValue::new(value).ok_or(InvalidCardValue(value))
    }
}

impl From<CardValue> for u8 {
    fn from(card: CardValue) -> Self {
        card.0
    }
}

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_jester() {
            f.write_str("J")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Formats a play the way the move log shows it: `pass` for no cards.
pub fn format_cards(cards: &[CardValue]) -> String {
    if cards.is_empty() {
        return "pass".to_string();
    }
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
