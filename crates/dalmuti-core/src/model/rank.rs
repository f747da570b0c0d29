use crate::model::player::{PLAYER_COUNT, PlayerId};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Social standing for a game, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    GreatDalmuti = 0,
    LesserDalmuti = 1,
    Merchant = 2,
    LesserPeon = 3,
    GreaterPeon = 4,
}

impl Rank {
    pub const ORDERED: [Rank; PLAYER_COUNT] = [
        Rank::GreatDalmuti,
        Rank::LesserDalmuti,
        Rank::Merchant,
        Rank::LesserPeon,
        Rank::GreaterPeon,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Rank::GreatDalmuti),
            1 => Some(Rank::LesserDalmuti),
            2 => Some(Rank::Merchant),
            3 => Some(Rank::LesserPeon),
            4 => Some(Rank::GreaterPeon),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Rank::GreatDalmuti => "Great Dalmuti",
            Rank::LesserDalmuti => "Lesser Dalmuti",
            Rank::Merchant => "Merchant",
            Rank::LesserPeon => "Lesser Peon",
            Rank::GreaterPeon => "Greater Peon",
        }
    }

    pub const fn abbreviation(self) -> &'static str {
        match self {
            Rank::GreatDalmuti => "GD",
            Rank::LesserDalmuti => "LD",
            Rank::Merchant => "M",
            Rank::LesserPeon => "LP",
            Rank::GreaterPeon => "GP",
        }
    }

    /// Rank `offset` steps further down the hierarchy, wrapping after GP.
    pub const fn rotated(self, offset: usize) -> Rank {
        match Rank::from_index((self.index() + offset) % PLAYER_COUNT) {
            Some(rank) => rank,
            None => Rank::GreatDalmuti,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankError {
    Duplicate(Rank),
    FinishOrderIncomplete,
}

impl fmt::Display for RankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankError::Duplicate(rank) => write!(f, "{rank} is assigned to more than one player"),
            RankError::FinishOrderIncomplete => {
                write!(f, "previous game has no finishing position for the person")
            }
        }
    }
}

impl std::error::Error for RankError {}

/// Bijection between players and ranks, indexed by [`PlayerId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[Rank; PLAYER_COUNT]", into = "[Rank; PLAYER_COUNT]")]
pub struct RankAssignment {
    ranks: [Rank; PLAYER_COUNT],
}

impl RankAssignment {
    pub fn new(ranks: [Rank; PLAYER_COUNT]) -> Result<Self, RankError> {
        let mut seen = [false; PLAYER_COUNT];
        for rank in ranks {
            if seen[rank.index()] {
                return Err(RankError::Duplicate(rank));
            }
            seen[rank.index()] = true;
        }
        Ok(Self { ranks })
    }

    /// Person holds `person`; bot `k` holds the rank `k` steps below it.
    pub fn rotated_from(person: Rank) -> Self {
        let ranks = std::array::from_fn(|offset| person.rotated(offset));
        Self { ranks }
    }

    /// Person's new rank is where they finished the previous game.
    pub fn from_finish_order(finish_order: &[PlayerId]) -> Result<Self, RankError> {
        let position = finish_order
            .iter()
            .position(|&player| player == PlayerId::Person)
            .and_then(Rank::from_index)
            .ok_or(RankError::FinishOrderIncomplete)?;
        Ok(Self::rotated_from(position))
    }

    pub fn rank_of(&self, player: PlayerId) -> Rank {
        self.ranks[player.index()]
    }

    pub fn holder(&self, rank: Rank) -> PlayerId {
        PlayerId::LOOP
            .iter()
            .copied()
            .find(|player| self.ranks[player.index()] == rank)
            .unwrap_or(PlayerId::Person)
    }

    pub fn ranks(&self) -> &[Rank; PLAYER_COUNT] {
        &self.ranks
    }
}

impl TryFrom<[Rank; PLAYER_COUNT]> for RankAssignment {
    type Error = RankError;

    fn try_from(ranks: [Rank; PLAYER_COUNT]) -> Result<Self, Self::Error> {
        RankAssignment::new(ranks)
    }
}

impl From<RankAssignment> for [Rank; PLAYER_COUNT] {
    fn from(assignment: RankAssignment) -> Self {
        assignment.ranks
    }
}
