mod play;
mod tax;

pub use play::{PlayPlanner, pick_cards};
pub use tax::{TaxPlanner, pick_highest_single};

use dalmuti_core::model::play::PlayError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Free leads need ceiling 14; constrained plays need a lower one.
    MismatchedContext { required: usize, ceiling: u8 },
    UnreadableTable(PlayError),
    EmptyHand,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::MismatchedContext { required, ceiling } => {
                write!(f, "invalid context: required={required}, ceiling={ceiling}")
            }
            PlanError::UnreadableTable(err) => write!(f, "cannot read table: {err}"),
            PlanError::EmptyHand => write!(f, "no cards to choose from"),
        }
    }
}

impl std::error::Error for PlanError {}
