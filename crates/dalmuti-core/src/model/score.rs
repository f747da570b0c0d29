use crate::model::hand::Hand;
use serde::{Deserialize, Serialize};

/// Person's score: what the bots still hold at the moment Person goes out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    points: u32,
    captured_at: Option<u32>,
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self {
            points: 0,
            captured_at: None,
        }
    }

    pub fn table_points<'a>(bot_hands: impl IntoIterator<Item = &'a Hand>) -> u32 {
        bot_hands.into_iter().map(Hand::penalty_total).sum()
    }

    /// Freezes the score the first time it is called; later calls are ignored.
    pub fn capture<'a>(
        &mut self,
        bot_hands: impl IntoIterator<Item = &'a Hand>,
        sequence: u32,
    ) -> bool {
        if self.captured_at.is_some() {
            return false;
        }
        self.points = Self::table_points(bot_hands);
        self.captured_at = Some(sequence);
        true
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn is_captured(&self) -> bool {
        self.captured_at.is_some()
    }

    /// Sequence number of the move that emptied Person's hand.
    pub fn captured_at(&self) -> Option<u32> {
        self.captured_at
    }
}
