use crate::model::card::CardValue;
use crate::model::hand::Hand;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const DECK_SIZE: usize = 80;
pub const JESTERS_PER_DECK: usize = 2;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<CardValue>,
}

impl Deck {
    /// Two Jesters plus `v` copies of every ordinary value `v`.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        cards.extend(std::iter::repeat(CardValue::JESTER).take(JESTERS_PER_DECK));
        for value in CardValue::ordinary_descending() {
            cards.extend(std::iter::repeat(value).take(value.value() as usize));
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[CardValue] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Deals round-robin into `player_count` canonical hands. Slot 0 receives
    /// the first card, so uneven decks leave later slots one card short.
    pub fn deal(&self, player_count: usize) -> Vec<Hand> {
        if player_count == 0 {
            return Vec::new();
        }
        let mut slots: Vec<Vec<CardValue>> = vec![Vec::new(); player_count];
        for (index, card) in self.cards.iter().enumerate() {
            slots[index % player_count].push(*card);
        }
        slots.into_iter().map(Hand::with_cards).collect()
    }
}
