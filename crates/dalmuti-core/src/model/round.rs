use crate::model::card::{CardValue, format_cards};
use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Consecutive passes that close a round.
pub const PASSES_TO_CLOSE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub sequence: u32,
    pub player: PlayerId,
    pub rank: Rank,
    pub cards: Vec<CardValue>,
    /// Pass recorded on behalf of a player who is already out.
    pub auto_pass: bool,
}

impl Move {
    pub fn is_pass(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.player.is_bot() {
            self.rank.name().to_string()
        } else {
            self.player.to_string()
        };
        write!(f, "{name}: {}", format_cards(&self.cards))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Round {
    moves: Vec<Move>,
}

impl Round {
    pub fn new() -> Self {
        Self { moves: Vec::new() }
    }

    pub fn push(&mut self, record: Move) {
        self.moves.push(record);
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Most recent move with cards; `None` means the next player leads freely.
    pub fn last_non_pass(&self) -> Option<&Move> {
        self.moves.iter().rev().find(|record| !record.is_pass())
    }

    pub fn table(&self) -> Option<&[CardValue]> {
        self.last_non_pass().map(|record| record.cards.as_slice())
    }

    pub fn everyone_passed(&self) -> bool {
        self.moves.len() >= PASSES_TO_CLOSE
            && self.moves[self.moves.len() - PASSES_TO_CLOSE..]
                .iter()
                .all(Move::is_pass)
    }

    pub fn card_count(&self) -> usize {
        self.moves.iter().map(|record| record.cards.len()).sum()
    }

    /// Moves worth showing: auto-passes of finished players are hidden.
    pub fn visible_moves(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter().filter(|record| !record.auto_pass)
    }
}
