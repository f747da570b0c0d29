use dalmuti_app::controller::{ControllerStatus, EngineOptions, GameController};
use dalmuti_app::error::{EngineError, Rejection};
use dalmuti_core::game::state::{GameState, Phase};
use dalmuti_core::model::card::CardValue;
use dalmuti_core::model::hand::Hand;
use dalmuti_core::model::player::PlayerId;
use dalmuti_core::model::rank::{Rank, RankAssignment};
use dalmuti_core::model::tax::TaxError;

fn hand(values: &[u8]) -> Hand {
    Hand::with_cards(CardValue::parse_all(values).unwrap())
}

fn controller(person: Rank, hands: [Hand; 5]) -> GameController {
    let ranks = RankAssignment::rotated_from(person);
    let state = GameState::from_parts(ranks, hands, Phase::Taxes);
    GameController::from_state(state, 1, EngineOptions::default()).unwrap()
}

#[test]
fn dalmutis_and_peons_swap_cards() {
    // Person M, Bot1 LP, Bot2 GP, Bot3 GD, Bot4 LD
    let mut controller = controller(
        Rank::Merchant,
        [
            hand(&[12, 12]),
            hand(&[7, 5, 5]),
            hand(&[12, 8, 8, 2, 2]),
            hand(&[10, 10, 6, 3, 1]),
            hand(&[11, 9, 4]),
        ],
    );
    controller.submit_pass().unwrap();

    let state = controller.state();
    assert_eq!(state.hand(PlayerId::Bot3), &hand(&[10, 3, 2, 2, 1]));
    assert_eq!(state.hand(PlayerId::Bot2), &hand(&[12, 10, 8, 8, 6]));
    assert_eq!(state.hand(PlayerId::Bot4), &hand(&[9, 5, 4]));
    assert_eq!(state.hand(PlayerId::Bot1), &hand(&[11, 7, 5]));
    assert_eq!(state.hand(PlayerId::Person), &hand(&[12, 12]));
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.up_next(), Some(PlayerId::Bot3));
    assert_eq!(state.revolution_caller(), None);
}

#[test]
fn peon_must_hand_over_best_cards() {
    // Person GP, Bot1 GD
    let mut controller = controller(
        Rank::GreaterPeon,
        [
            hand(&[12, 8, 3, 2]),
            hand(&[11, 10, 9]),
            hand(&[7]),
            hand(&[6]),
            hand(&[5]),
        ],
    );
    let before = controller.state().clone();
    controller.select_tax_card(1).unwrap();
    controller.select_tax_card(2).unwrap();
    let err = controller.submit_taxes().unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rejected(Rejection::IllegalTaxSelection(TaxError::NotBestCards { .. }))
    ));
    assert!(!err.is_fatal());
    assert_eq!(controller.state().hands(), before.hands());
    assert_eq!(controller.state().phase(), Phase::Taxes);

    controller.clear_tax_selection().unwrap();
    controller.select_tax_card(3).unwrap();
    controller.select_tax_card(2).unwrap();
    controller.submit_taxes().unwrap();
    // GD's two highest singles from 12 down to 6 are 11 and 10
    assert_eq!(controller.state().hand(PlayerId::Person), &hand(&[12, 11, 10, 8]));
    assert_eq!(controller.state().hand(PlayerId::Bot1), &hand(&[9, 3, 2]));
}

#[test]
fn merchant_cannot_pay_cards() {
    // Person M, Bot1 LP, Bot2 GP, Bot3 GD, Bot4 LD
    let mut controller = controller(
        Rank::Merchant,
        [
            hand(&[9, 4]),
            hand(&[7]),
            hand(&[8, 3]),
            hand(&[10, 6]),
            hand(&[5]),
        ],
    );
    controller.select_tax_card(0).unwrap();
    assert!(matches!(
        controller.submit_taxes(),
        Err(EngineError::Rejected(Rejection::IllegalTaxSelection(
            TaxError::WrongCount { expected: 0, actual: 1, .. }
        )))
    ));
    assert!(matches!(
        controller.submit_pass(),
        Err(EngineError::Rejected(Rejection::SelectionNotEmpty))
    ));
}

#[test]
fn person_calls_revolution_with_both_jesters() {
    // Person GP, Bot1 GD
    let hands = [
        hand(&[9, 4, 13, 13]),
        hand(&[12, 11]),
        hand(&[10]),
        hand(&[8]),
        hand(&[7]),
    ];
    let mut controller = controller(Rank::GreaterPeon, hands.clone());
    controller.select_tax_card(2).unwrap();
    controller.select_tax_card(3).unwrap();
    controller.submit_taxes().unwrap();

    let state = controller.state();
    assert_eq!(state.revolution_caller(), Some(Rank::GreaterPeon));
    assert_eq!(state.hands(), &hands);
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.up_next(), Some(PlayerId::Bot1));
    assert!(controller.snapshot().game.intents.start_round);
}

#[test]
fn bot_revolution_skips_the_exchange_even_for_a_leading_person() {
    // Person GD, Bot1 LD, Bot2 M, Bot3 LP, Bot4 GP
    let hands = [
        hand(&[12, 11, 2]),
        hand(&[10, 9]),
        hand(&[8]),
        hand(&[5, 13, 13]),
        hand(&[7, 6]),
    ];
    let mut controller = controller(Rank::GreatDalmuti, hands.clone());
    controller.select_tax_card(0).unwrap();
    controller.select_tax_card(1).unwrap();
    controller.submit_taxes().unwrap();

    assert_eq!(controller.state().revolution_caller(), Some(Rank::LesserPeon));
    assert_eq!(controller.state().hands(), &hands);
    assert_eq!(controller.state().phase(), Phase::Ready);

    controller.start_round().unwrap();
    assert_eq!(controller.state().phase(), Phase::Ongoing);
    assert_eq!(controller.state().up_next(), Some(PlayerId::Person));
    assert!(controller.state().round().is_empty());
}

#[test]
fn great_dalmuti_person_leads_straight_after_taxes() {
    // Person GD, Bot4 GP
    let mut controller = controller(
        Rank::GreatDalmuti,
        [
            hand(&[12, 11, 2]),
            hand(&[10, 9]),
            hand(&[8]),
            hand(&[6, 5]),
            hand(&[7, 4, 3]),
        ],
    );
    controller.select_tax_card(0).unwrap();
    controller.select_tax_card(1).unwrap();
    controller.submit_taxes().unwrap();

    let state = controller.state();
    assert_eq!(state.phase(), Phase::Ongoing);
    assert_eq!(state.up_next(), Some(PlayerId::Person));
    assert_eq!(state.hand(PlayerId::Person), &hand(&[4, 3, 2]));
    assert_eq!(state.hand(PlayerId::Bot4), &hand(&[12, 11, 7]));
}

#[test]
fn person_selection_is_checked_before_bots_pay() {
    // Bot3 is GD with a single card and cannot pay two; the rejection comes first
    let mut controller = controller(
        Rank::Merchant,
        [hand(&[9, 4]), hand(&[8]), hand(&[7]), hand(&[6]), hand(&[5])],
    );
    controller.select_tax_card(0).unwrap();
    let err = controller.submit_taxes().unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rejected(Rejection::IllegalTaxSelection(TaxError::WrongCount { .. }))
    ));
    assert_eq!(controller.status(), ControllerStatus::Waiting);
    assert!(controller.fault().is_none());
    controller.clear_tax_selection().unwrap();
}

#[test]
fn great_dalmuti_person_can_call_revolution() {
    // Person GD, Bot1 LD, Bot2 M, Bot3 LP, Bot4 GP
    let hands = [
        hand(&[9, 4, 13, 13]),
        hand(&[11, 10]),
        hand(&[8]),
        hand(&[7]),
        hand(&[6, 1]),
    ];
    let mut controller = controller(Rank::GreatDalmuti, hands.clone());
    controller.select_tax_card(2).unwrap();
    controller.select_tax_card(3).unwrap();
    controller.submit_taxes().unwrap();

    let state = controller.state();
    assert_eq!(state.revolution_caller(), Some(Rank::GreatDalmuti));
    assert_eq!(state.hands(), &hands);
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.up_next(), Some(PlayerId::Person));

    controller.start_round().unwrap();
    assert_eq!(controller.state().revolution_caller(), None);
    assert_eq!(controller.state().up_next(), Some(PlayerId::Person));
}

#[test]
fn lesser_dalmuti_person_can_call_revolution() {
    // Person LD, Bot1 M, Bot2 LP, Bot3 GP, Bot4 GD
    let hands = [
        hand(&[9, 4, 13, 13]),
        hand(&[8]),
        hand(&[7]),
        hand(&[6, 1]),
        hand(&[12, 11]),
    ];
    let mut controller = controller(Rank::LesserDalmuti, hands.clone());
    controller.select_tax_card(2).unwrap();
    controller.select_tax_card(3).unwrap();
    controller.submit_taxes().unwrap();

    let state = controller.state();
    assert_eq!(state.revolution_caller(), Some(Rank::LesserDalmuti));
    assert_eq!(state.hands(), &hands);
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.up_next(), Some(PlayerId::Bot4));
}
