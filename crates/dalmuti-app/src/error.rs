use dalmuti_bot::PlanError;
use dalmuti_core::game::selection::SelectionError;
use dalmuti_core::game::state::{Phase, StateError};
use dalmuti_core::model::card::{CardValue, format_cards};
use dalmuti_core::model::play::PlayError;
use dalmuti_core::model::player::PlayerId;
use dalmuti_core::model::tax::TaxError;
use thiserror::Error;

/// Person asked for something the rules do not allow right now. Nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("cannot {intent} during the {phase} phase")]
    WrongPhase { intent: &'static str, phase: Phase },
    #[error("it is not your turn")]
    NotYourTurn { up_next: Option<PlayerId> },
    #[error(transparent)]
    SelectionOutOfRange(#[from] SelectionError),
    #[error("select at least one card to play")]
    EmptySelection,
    #[error("deselect your cards before passing")]
    SelectionNotEmpty,
    #[error("illegal play: {0}")]
    IllegalPlay(PlayError),
    #[error("illegal tax selection: {0}")]
    IllegalTaxSelection(TaxError),
}

/// Broken engine invariant. The game is aborted until the next reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("{player} produced an invalid move [{}]: {source}", format_cards(.cards))]
    InvalidBotMove {
        player: PlayerId,
        cards: Vec<CardValue>,
        #[source]
        source: PlayError,
    },
    #[error("malformed play on the table: {0}")]
    MalformedPlay(PlayError),
    #[error("game state rejected a move: {0}")]
    State(#[from] StateError),
    #[error("tax exchange failed: {0}")]
    Tax(#[from] TaxError),
    #[error("no player is up next")]
    MissingTurn,
    #[error("planner failed for {player}: {source}")]
    Planner {
        player: PlayerId,
        #[source]
        source: PlanError,
    },
    #[error("game was aborted by an earlier fault; reset to continue")]
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Fatal(#[from] Fault),
}

impl EngineError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Fatal(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            EngineError::Rejected(rejection) => Some(rejection),
            EngineError::Fatal(_) => None,
        }
    }
}
