use crate::game::selection::Selection;
use crate::model::card::CardValue;
use crate::model::deck::Deck;
use crate::model::hand::{Hand, HandError};
use crate::model::player::{PLAYER_COUNT, PlayerId};
use crate::model::rank::{Rank, RankAssignment};
use crate::model::round::{Move, Round};
use crate::model::score::ScoreBoard;
use crate::model::tax::{TaxError, TaxLedger};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::{array, mem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Taxes,
    Ready,
    Ongoing,
    Over,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Taxes => "Taxes",
            Phase::Ready => "Ready",
            Phase::Ongoing => "Ongoing",
            Phase::Over => "Over",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    AlreadyFinished(PlayerId),
    DuplicateFinisher(PlayerId),
    NonCanonicalHand(PlayerId),
    Hand { player: PlayerId, source: HandError },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::AlreadyFinished(player) => {
                write!(f, "{player} already went out and cannot play cards")
            }
            StateError::DuplicateFinisher(player) => {
                write!(f, "{player} appears twice in the finish order")
            }
            StateError::NonCanonicalHand(player) => {
                write!(f, "hand of {player} is not in canonical order")
            }
            StateError::Hand { player, source } => write!(f, "{player}: {source}"),
        }
    }
}

impl std::error::Error for StateError {}

/// What happened to the game when a move was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub sequence: u32,
    /// Finish position (0 = first out) if this move emptied the hand.
    pub finished_at: Option<usize>,
    pub score_captured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    phase: Phase,
    ranks: RankAssignment,
    hands: [Hand; PLAYER_COUNT],
    finish_order: Vec<PlayerId>,
    round: Round,
    history: Vec<Round>,
    score: ScoreBoard,
    revolution_caller: Option<Rank>,
    up_next: Option<PlayerId>,
    next_sequence: u32,
    selection: Selection,
}

impl GameState {
    /// Deals `deck` round-robin into rank slots starting at the Great Dalmuti.
    pub fn deal(ranks: RankAssignment, deck: &Deck) -> Self {
        let mut slots = deck.deal(PLAYER_COUNT).into_iter();
        let by_rank: [Hand; PLAYER_COUNT] = array::from_fn(|_| slots.next().unwrap_or_default());
        let hands = array::from_fn(|seat| {
            let rank = ranks.rank_of(PlayerId::LOOP[seat]);
            by_rank[rank.index()].clone()
        });
        Self::from_parts(ranks, hands, Phase::Taxes)
    }

    /// Builds a state around arbitrary hands; used for fixtures and tests.
    pub fn from_parts(ranks: RankAssignment, hands: [Hand; PLAYER_COUNT], phase: Phase) -> Self {
        Self {
            phase,
            ranks,
            hands,
            finish_order: Vec::new(),
            round: Round::new(),
            history: Vec::new(),
            score: ScoreBoard::new(),
            revolution_caller: None,
            up_next: None,
            next_sequence: 1,
            selection: Selection::new(),
        }
    }

    /// Checks the invariants a deserialized fixture must hold.
    pub fn validate(&self) -> Result<(), StateError> {
        for player in PlayerId::LOOP {
            if !self.hands[player.index()].is_canonical() {
                return Err(StateError::NonCanonicalHand(player));
            }
        }
        for (i, player) in self.finish_order.iter().enumerate() {
            if self.finish_order[..i].contains(player) {
                return Err(StateError::DuplicateFinisher(*player));
            }
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn ranks(&self) -> &RankAssignment {
        &self.ranks
    }

    pub fn rank_of(&self, player: PlayerId) -> Rank {
        self.ranks.rank_of(player)
    }

    pub fn hand(&self, player: PlayerId) -> &Hand {
        &self.hands[player.index()]
    }

    pub fn hands(&self) -> &[Hand; PLAYER_COUNT] {
        &self.hands
    }

    pub fn bot_hands(&self) -> impl Iterator<Item = &Hand> {
        PlayerId::BOTS.iter().map(|bot| &self.hands[bot.index()])
    }

    pub fn finish_order(&self) -> &[PlayerId] {
        &self.finish_order
    }

    pub fn finish_position(&self, player: PlayerId) -> Option<usize> {
        self.finish_order.iter().position(|&p| p == player)
    }

    pub fn is_finished(&self, player: PlayerId) -> bool {
        self.finish_order.contains(&player)
    }

    /// Out of cards or already ranked; such players are auto-passed.
    pub fn is_out(&self, player: PlayerId) -> bool {
        self.is_finished(player) || self.hands[player.index()].is_empty()
    }

    pub fn everyone_finished(&self) -> bool {
        self.finish_order.len() == PLAYER_COUNT
    }

    pub fn all_bots_finished(&self) -> bool {
        PlayerId::BOTS.iter().all(|&bot| self.is_finished(bot))
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn history(&self) -> &[Round] {
        &self.history
    }

    /// Cards on the table for the next player to beat; `None` is a free lead.
    pub fn table(&self) -> Option<&[CardValue]> {
        self.round.table()
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    pub fn revolution_caller(&self) -> Option<Rank> {
        self.revolution_caller
    }

    pub fn set_revolution_caller(&mut self, caller: Option<Rank>) {
        self.revolution_caller = caller;
    }

    pub fn up_next(&self) -> Option<PlayerId> {
        self.up_next
    }

    pub fn set_up_next(&mut self, player: Option<PlayerId>) {
        self.up_next = player;
    }

    pub fn next_sequence(&self) -> u32 {
        self.next_sequence
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Cards Person currently has picked, in hand order.
    pub fn selected_cards(&self) -> Vec<CardValue> {
        self.selection.cards(self.hand(PlayerId::Person))
    }

    /// Sum of cards held, on the table and in archived rounds.
    pub fn card_total(&self) -> usize {
        let held: usize = self.hands.iter().map(Hand::len).sum();
        let archived: usize = self.history.iter().map(Round::card_count).sum();
        held + self.round.card_count() + archived
    }

    /// Swaps the recorded tax payments between hands.
    pub fn settle_taxes(&mut self, ledger: &TaxLedger) -> Result<(), TaxError> {
        ledger.settle(&mut self.hands, &self.ranks)?;
        self.selection.clear();
        Ok(())
    }

    /// Removes `cards` from the player's hand and records the move.
    pub fn apply_move(
        &mut self,
        player: PlayerId,
        cards: Vec<CardValue>,
        auto_pass: bool,
    ) -> Result<MoveOutcome, StateError> {
        if !cards.is_empty() && self.is_finished(player) {
            return Err(StateError::AlreadyFinished(player));
        }
        self.hands[player.index()]
            .remove_all(&cards)
            .map_err(|source| StateError::Hand { player, source })?;

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let emptied = !cards.is_empty() && self.hands[player.index()].is_empty();
        self.round.push(Move {
            sequence,
            player,
            rank: self.ranks.rank_of(player),
            cards,
            auto_pass,
        });

        if player == PlayerId::Person {
            self.selection.clear();
        }

        let mut outcome = MoveOutcome {
            sequence,
            finished_at: None,
            score_captured: false,
        };
        if emptied && !self.is_finished(player) {
            outcome.finished_at = Some(self.finish_order.len());
            self.finish_order.push(player);
            if player == PlayerId::Person {
                let bots = PlayerId::BOTS.map(|bot| &self.hands[bot.index()]);
                outcome.score_captured = self.score.capture(bots, sequence);
            }
        }
        Ok(outcome)
    }

    /// Moves the live round into history; sequence numbers keep counting.
    pub fn archive_round(&mut self) {
        let finished = mem::take(&mut self.round);
        if !finished.is_empty() {
            self.history.push(finished);
        }
    }
}
