use dalmuti_app::controller::GameController;
use dalmuti_bot::{HeuristicPolicy, Policy, PolicyContext};
use dalmuti_core::game::selection::Selection;
use dalmuti_core::game::state::Phase;
use dalmuti_core::model::card::CardValue;
use dalmuti_core::model::deck::DECK_SIZE;
use dalmuti_core::model::player::PlayerId;
use dalmuti_core::model::rank::Rank;
use dalmuti_core::model::tax::TaxDecision;
use proptest::prelude::*;

fn person_cards(controller: &GameController, taxes: bool) -> Vec<CardValue> {
    let state = controller.state();
    let ctx = PolicyContext {
        player: PlayerId::Person,
        rank: state.rank_of(PlayerId::Person),
        hand: state.hand(PlayerId::Person),
        table: state.table(),
    };
    let mut policy = HeuristicPolicy::new();
    if taxes {
        match policy.choose_tax(&ctx).unwrap() {
            TaxDecision::Revolution => vec![CardValue::JESTER; 2],
            TaxDecision::Pay(cards) => cards,
        }
    } else {
        policy.choose_play(&ctx).unwrap()
    }
}

fn select(controller: &GameController, cards: &[CardValue]) -> Vec<usize> {
    Selection::for_cards(controller.state().hand(PlayerId::Person), cards)
        .unwrap()
        .indices()
        .collect()
}

fn play_to_completion(controller: &mut GameController) {
    for _ in 0..5_000 {
        assert_eq!(controller.state().card_total(), DECK_SIZE);
        match controller.state().phase() {
            Phase::Taxes => {
                let cards = person_cards(controller, true);
                for index in select(controller, &cards) {
                    controller.select_tax_card(index).unwrap();
                }
                if cards.is_empty() {
                    controller.submit_pass().unwrap();
                } else {
                    controller.submit_taxes().unwrap();
                }
            }
            Phase::Ready => controller.start_round().unwrap(),
            Phase::Ongoing => {
                assert_eq!(controller.state().up_next(), Some(PlayerId::Person));
                let cards = person_cards(controller, false);
                if cards.is_empty() {
                    controller.submit_pass().unwrap();
                } else {
                    for index in select(controller, &cards) {
                        controller.toggle_card_selection(index).unwrap();
                    }
                    controller.submit_play().unwrap();
                }
            }
            Phase::Over => return,
        }
    }
    panic!("game did not finish");
}

#[test]
fn seeded_games_run_to_completion_and_conserve_cards() {
    for seed in [1u64, 7, 99, 2024, 31337] {
        let mut controller = GameController::with_seed(seed);
        play_to_completion(&mut controller);

        let state = controller.state();
        assert_eq!(state.phase(), Phase::Over);
        assert_eq!(state.finish_order().len(), 5);
        assert!(state.validate().is_ok());
        assert_eq!(state.card_total(), DECK_SIZE);
        assert!(state.score().is_captured());
        assert!(state.round().is_empty());
        assert_eq!(state.up_next(), None);

        let snapshot = controller.snapshot();
        assert!(snapshot.game.intents.new_game);
        assert!(snapshot.game.outcome.is_some());
    }
}

#[test]
fn move_sequence_numbers_are_contiguous_across_rounds() {
    let mut controller = GameController::with_seed(8);
    play_to_completion(&mut controller);
    let state = controller.state();
    let sequences: Vec<u32> = state
        .history()
        .iter()
        .flat_map(|round| round.moves())
        .map(|record| record.sequence)
        .collect();
    let expected: Vec<u32> = (1..=sequences.len() as u32).collect();
    assert_eq!(sequences, expected);
}

#[test]
fn continuing_ranks_person_by_previous_finish() {
    let mut controller = GameController::with_seed(12);
    play_to_completion(&mut controller);
    let position = controller
        .state()
        .finish_position(PlayerId::Person)
        .unwrap();

    let old_token = controller.token();
    let token = controller.reset(true);
    assert_ne!(token, old_token);
    assert_eq!(controller.state().phase(), Phase::Taxes);
    assert_eq!(
        controller.state().rank_of(PlayerId::Person),
        Rank::from_index(position).unwrap()
    );
    assert!(controller.state().finish_order().is_empty());
    assert_eq!(controller.state().card_total(), DECK_SIZE);
}

#[test]
fn identical_seeds_replay_identical_games() {
    let mut a = GameController::with_seed(77);
    let mut b = GameController::with_seed(77);
    play_to_completion(&mut a);
    play_to_completion(&mut b);
    assert_eq!(a.state(), b.state());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn any_seed_plays_through_consecutive_games(seed in any::<u64>(), games in 1usize..4) {
        let mut controller = GameController::with_seed(seed);
        for game in 0..games {
            if game > 0 {
                controller.reset(true);
            }
            play_to_completion(&mut controller);

            let state = controller.state();
            prop_assert_eq!(state.phase(), Phase::Over);
            prop_assert_eq!(state.finish_order().len(), 5);
            prop_assert_eq!(state.card_total(), DECK_SIZE);
            prop_assert!(state.score().is_captured());
            prop_assert_eq!(state.up_next(), None);
        }
    }
}
