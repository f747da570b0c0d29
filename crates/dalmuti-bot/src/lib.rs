#![deny(warnings)]
pub mod bot;
pub mod policy;

pub use bot::{PlanError, PlayPlanner, TaxPlanner, pick_cards, pick_highest_single};
pub use policy::{HeuristicPolicy, Policy, PolicyContext};
