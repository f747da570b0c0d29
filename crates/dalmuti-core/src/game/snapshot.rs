use super::state::{GameState, Phase};
use crate::model::hand::Hand;
use crate::model::player::{PLAYER_COUNT, PlayerId};
use crate::model::rank::{Rank, RankAssignment};
use crate::model::round::Move;
use serde::{Deserialize, Serialize};

/// Which Person intents the presentation layer may offer right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    pub play: bool,
    pub pass: bool,
    pub start_round: bool,
    pub new_game: bool,
}

impl Intents {
    pub fn for_state(state: &GameState) -> Self {
        let persons_turn =
            state.phase() == Phase::Ongoing && state.up_next() == Some(PlayerId::Person);
        let has_selection = !state.selection().is_empty();
        let taxes = state.phase() == Phase::Taxes;
        let merchant = state.rank_of(PlayerId::Person) == Rank::Merchant;

        Intents {
            play: has_selection && (persons_turn || taxes),
            pass: !has_selection && (persons_turn || (taxes && merchant)),
            start_round: state.phase() == Phase::Ready,
            new_game: state.phase() == Phase::Over,
        }
    }
}

/// Person's standing at the end of a game compared with the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub start_rank: Rank,
    pub finish_rank: Rank,
    pub score: u32,
}

impl Outcome {
    pub fn kept_rank(&self) -> bool {
        self.start_rank == self.finish_rank
    }

    pub fn headline(&self) -> String {
        let tense = if self.kept_rank() { "still" } else { "now" };
        format!("You are {tense} the {}", self.finish_rank)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub ranks: RankAssignment,
    pub hands: [Hand; PLAYER_COUNT],
    pub up_next: Option<PlayerId>,
    pub current_round: Vec<Move>,
    pub previous_round: Vec<Move>,
    pub finish_order: Vec<PlayerId>,
    pub score: u32,
    pub score_captured: bool,
    pub revolution_caller: Option<Rank>,
    pub selection: Vec<usize>,
    pub intents: Intents,
    pub outcome: Option<Outcome>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let outcome = state
            .finish_position(PlayerId::Person)
            .and_then(Rank::from_index)
            .map(|finish_rank| Outcome {
                start_rank: state.rank_of(PlayerId::Person),
                finish_rank,
                score: state.score().points(),
            });

        GameSnapshot {
            phase: state.phase(),
            ranks: *state.ranks(),
            hands: state.hands().clone(),
            up_next: state.up_next(),
            current_round: state.round().visible_moves().cloned().collect(),
            previous_round: state
                .history()
                .last()
                .map(|round| round.visible_moves().cloned().collect())
                .unwrap_or_default(),
            finish_order: state.finish_order().to_vec(),
            score: state.score().points(),
            score_captured: state.score().is_captured(),
            revolution_caller: state.revolution_caller(),
            selection: state.selection().indices().collect(),
            intents: Intents::for_state(state),
            outcome,
        }
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::capture(state))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::{GameSnapshot, Intents, Outcome};
    use crate::game::state::{GameState, Phase};
    use crate::model::card::CardValue;
    use crate::model::hand::Hand;
    use crate::model::player::PlayerId;
    use crate::model::rank::{Rank, RankAssignment};

    fn hand(values: &[u8]) -> Hand {
        Hand::with_cards(CardValue::parse_all(values).unwrap())
    }

    fn state(person: Rank, phase: Phase) -> GameState {
        let hands = [hand(&[4, 2]), hand(&[9]), hand(&[8]), hand(&[7]), hand(&[6])];
        GameState::from_parts(RankAssignment::rotated_from(person), hands, phase)
    }

    #[test]
    fn play_needs_selection_on_persons_turn() {
        let mut game = state(Rank::GreatDalmuti, Phase::Ongoing);
        game.set_up_next(Some(PlayerId::Person));
        let intents = Intents::for_state(&game);
        assert!(!intents.play);
        assert!(intents.pass);

        let person_hand = game.hand(PlayerId::Person).clone();
        game.selection_mut().toggle(1, &person_hand).unwrap();
        let intents = Intents::for_state(&game);
        assert!(intents.play);
        assert!(!intents.pass);

        game.set_up_next(Some(PlayerId::Bot1));
        assert_eq!(Intents::for_state(&game), Intents::default());
    }

    #[test]
    fn merchant_may_pass_through_taxes() {
        let game = state(Rank::Merchant, Phase::Taxes);
        assert!(Intents::for_state(&game).pass);
        let game = state(Rank::LesserPeon, Phase::Taxes);
        assert!(!Intents::for_state(&game).pass);
        let game = state(Rank::LesserPeon, Phase::Ready);
        assert!(Intents::for_state(&game).start_round);
    }

    #[test]
    fn outcome_reports_still_or_now() {
        let kept = Outcome {
            start_rank: Rank::Merchant,
            finish_rank: Rank::Merchant,
            score: 10,
        };
        assert_eq!(kept.headline(), "You are still the Merchant");
        let promoted = Outcome {
            finish_rank: Rank::GreatDalmuti,
            ..kept
        };
        assert_eq!(promoted.headline(), "You are now the Great Dalmuti");
    }

    #[test]
    fn snapshot_exposes_outcome_once_person_finishes() {
        let mut game = state(Rank::LesserPeon, Phase::Ongoing);
        assert!(GameSnapshot::capture(&game).outcome.is_none());
        game.apply_move(PlayerId::Bot1, CardValue::parse_all(&[9]).unwrap(), false)
            .unwrap();
        game.apply_move(PlayerId::Person, CardValue::parse_all(&[4, 2]).unwrap(), false)
            .unwrap();
        let snapshot = GameSnapshot::capture(&game);
        let outcome = snapshot.outcome.unwrap();
        assert_eq!(outcome.finish_rank, Rank::LesserDalmuti);
        assert_eq!(outcome.start_rank, Rank::LesserPeon);
        assert!(snapshot.score_captured);
    }

    #[test]
    fn move_log_hides_auto_passes() {
        let mut game = state(Rank::Merchant, Phase::Ongoing);
        game.apply_move(PlayerId::Bot1, CardValue::parse_all(&[9]).unwrap(), false)
            .unwrap();
        game.apply_move(PlayerId::Bot2, Vec::new(), true).unwrap();
        game.apply_move(PlayerId::Bot3, Vec::new(), false).unwrap();

        let snapshot = GameSnapshot::capture(&game);
        let shown: Vec<u32> = snapshot.current_round.iter().map(|m| m.sequence).collect();
        assert_eq!(shown, vec![1, 3]);
        assert_eq!(game.round().len(), 3);

        game.archive_round();
        let snapshot = GameSnapshot::capture(&game);
        assert!(snapshot.current_round.is_empty());
        assert_eq!(snapshot.previous_round.len(), 2);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let game = state(Rank::Merchant, Phase::Taxes);
        let json = GameSnapshot::to_json(&game).unwrap();
        assert!(json.contains("\"phase\": \"Taxes\""));
        let restored = GameSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, GameSnapshot::capture(&game));
    }
}
