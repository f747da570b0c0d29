use serde::Serialize;
use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

/// Identifies the game a continuation was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameToken(u64);

impl GameToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    /// Let whoever is up next act, or close the round.
    Turn,
    /// Move the game to `Over` once everyone is out.
    FinishGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pace {
    Immediate,
    /// Long enough for a viewer to follow the previous move.
    Presentation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    pub token: GameToken,
    pub step: Step,
    pub pace: Pace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed,
    /// The step belonged to a game that has since been reset.
    Stale,
}

/// Receives the delay before each continuation runs.
pub trait Pacing: Send {
    fn pause(&mut self, pace: Pace);
}

/// Headless pacing: every continuation runs immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacing for NoPacing {
    fn pause(&mut self, _pace: Pace) {}
}

/// Blocks the calling thread for presentation steps.
#[derive(Debug, Clone, Copy)]
pub struct SleepPacing {
    presentation: Duration,
}

impl SleepPacing {
    pub fn new(presentation: Duration) -> Self {
        Self { presentation }
    }
}

impl Pacing for SleepPacing {
    fn pause(&mut self, pace: Pace) {
        if pace == Pace::Presentation && !self.presentation.is_zero() {
            thread::sleep(self.presentation);
        }
    }
}

/// FIFO of continuations tagged with the game that produced them.
#[derive(Debug, Default)]
pub struct Scheduler {
    epoch: u64,
    queue: VecDeque<ScheduledStep>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates everything queued so far and returns the new game's token.
    pub fn begin_game(&mut self) -> GameToken {
        self.epoch += 1;
        self.queue.clear();
        self.current()
    }

    pub fn current(&self) -> GameToken {
        GameToken(self.epoch)
    }

    pub fn is_current(&self, token: GameToken) -> bool {
        token == self.current()
    }

    pub fn schedule(&mut self, step: Step, pace: Pace) {
        self.queue.push_back(ScheduledStep {
            token: self.current(),
            step,
            pace,
        });
    }

    pub fn pop(&mut self) -> Option<ScheduledStep> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
