#![deny(warnings)]
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod simulate;

pub use controller::{ControllerSnapshot, ControllerStatus, Drive, EngineOptions, GameController};
pub use error::{EngineError, Fault, Rejection};
pub use scheduler::{GameToken, NoPacing, Pace, Pacing, ScheduledStep, SleepPacing, Step, StepOutcome};
