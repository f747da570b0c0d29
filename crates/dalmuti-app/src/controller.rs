use crate::error::{EngineError, Fault, Rejection};
use crate::scheduler::{
    GameToken, NoPacing, Pace, Pacing, ScheduledStep, Scheduler, Step, StepOutcome,
};
use dalmuti_bot::{HeuristicPolicy, Policy, PolicyContext};
use dalmuti_core::game::snapshot::GameSnapshot;
use dalmuti_core::game::state::{GameState, Phase};
use dalmuti_core::model::card::{CardValue, format_cards};
use dalmuti_core::model::deck::Deck;
use dalmuti_core::model::play::check_play;
use dalmuti_core::model::player::PlayerId;
use dalmuti_core::model::rank::{Rank, RankAssignment};
use dalmuti_core::model::tax::{TaxLedger, validate_selection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Who advances the continuation queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Drive {
    /// Intents drain the queue before returning.
    #[default]
    Eager,
    /// The caller owns the timers and runs `next_step`/`execute` itself.
    Manual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Let the bot heuristic finish Person's hand once every bot is out.
    pub autoplay_person_when_alone: bool,
    pub drive: Drive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerStatus {
    /// Nothing queued; waiting for a Person intent.
    Waiting,
    /// Continuations are queued.
    Running,
    Aborted,
}

/// Everything the presentation layer reads after each intent.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub status: ControllerStatus,
    pub token: u64,
    pub fault: Option<String>,
    #[serde(flatten)]
    pub game: GameSnapshot,
}

impl ControllerSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub struct GameController {
    state: GameState,
    rng: StdRng,
    seed: u64,
    scheduler: Scheduler,
    pacing: Box<dyn Pacing>,
    policy: Box<dyn Policy>,
    options: EngineOptions,
    fault: Option<Fault>,
}

impl GameController {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Deals the first game from a seeded generator; equal seeds replay equal games.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_options(seed, EngineOptions::default())
    }

    pub fn with_options(seed: u64, options: EngineOptions) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let ranks = random_ranks(&mut rng);
        let state = GameState::deal(ranks, &Deck::shuffled(&mut rng));
        let controller = Self::assemble(state, rng, seed, options);
        controller.log_new_game();
        controller
    }

    /// Adopts an arbitrary state, e.g. a test fixture. Call [`Self::resume`] to continue it.
    pub fn from_state(state: GameState, seed: u64, options: EngineOptions) -> Result<Self, Fault> {
        state.validate()?;
        Ok(Self::assemble(state, StdRng::seed_from_u64(seed), seed, options))
    }

    fn assemble(state: GameState, rng: StdRng, seed: u64, options: EngineOptions) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.begin_game();
        Self {
            state,
            rng,
            seed,
            scheduler,
            pacing: Box::new(NoPacing),
            policy: Box::new(HeuristicPolicy::new()),
            options,
            fault: None,
        }
    }

    pub fn with_policy(mut self, policy: Box<dyn Policy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pacing(mut self, pacing: Box<dyn Pacing>) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn token(&self) -> GameToken {
        self.scheduler.current()
    }

    pub fn pending_steps(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    pub fn status(&self) -> ControllerStatus {
        if self.fault.is_some() {
            ControllerStatus::Aborted
        } else if self.scheduler.pending() > 0 {
            ControllerStatus::Running
        } else {
            ControllerStatus::Waiting
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            status: self.status(),
            token: self.token().value(),
            fault: self.fault.as_ref().map(ToString::to_string),
            game: GameSnapshot::capture(&self.state),
        }
    }

    /// Deals a new game. Continuing ranks Person by their finish in the game just played.
    pub fn reset(&mut self, continue_previous_game: bool) -> GameToken {
        let ranks = if continue_previous_game {
            match RankAssignment::from_finish_order(self.state.finish_order()) {
                Ok(ranks) => ranks,
                Err(err) => {
                    warn!(%err, "cannot continue ranks; dealing random ranks");
                    random_ranks(&mut self.rng)
                }
            }
        } else {
            random_ranks(&mut self.rng)
        };

        let deck = Deck::shuffled(&mut self.rng);
        self.state = GameState::deal(ranks, &deck);
        self.fault = None;
        let token = self.scheduler.begin_game();
        self.log_new_game();
        token
    }

    pub fn select_tax_card(&mut self, index: usize) -> Result<bool, EngineError> {
        self.guard()?;
        self.require_phase(Phase::Taxes, "select a tax card")?;
        self.toggle_person_card(index)
    }

    pub fn clear_tax_selection(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        self.require_phase(Phase::Taxes, "clear the tax selection")?;
        self.state.selection_mut().clear();
        Ok(())
    }

    /// Collects every tax, then either swaps cards or starts a revolution.
    pub fn submit_taxes(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        self.require_phase(Phase::Taxes, "pay taxes")?;

        let person_rank = self.state.rank_of(PlayerId::Person);
        let selected = self.state.selected_cards();
        let person_decision =
            validate_selection(person_rank, self.state.hand(PlayerId::Person), &selected)
                .map_err(|err| self.reject(Rejection::IllegalTaxSelection(err)))?;

        let mut ledger = TaxLedger::new();
        let person_hand = self.state.hand(PlayerId::Person);
        if let Err(err) = ledger.record(person_rank, person_hand, person_decision) {
            return Err(self.fail(err.into()));
        }

        // Person's revolution short-circuits the bots' taxes.
        if ledger.revolution().is_none() {
            for bot in PlayerId::BOTS {
                let rank = self.state.rank_of(bot);
                let hand = self.state.hand(bot);
                let ctx = PolicyContext {
                    player: bot,
                    rank,
                    hand,
                    table: None,
                };
                let recorded = match self.policy.choose_tax(&ctx) {
                    Ok(decision) => ledger.record_bot(rank, hand, decision).map_err(Fault::from),
                    Err(source) => Err(Fault::Planner { player: bot, source }),
                };
                if let Err(fault) = recorded {
                    return Err(self.fail(fault));
                }
            }
        }

        let leader = self.state.ranks().holder(Rank::GreatDalmuti);
        self.state.set_up_next(Some(leader));
        if let Some(caller) = ledger.revolution() {
            self.state.set_revolution_caller(Some(caller));
            self.state.selection_mut().clear();
            self.state.set_phase(Phase::Ready);
            info!(caller = %caller, "revolution called; no taxes exchanged");
            return Ok(());
        }

        if let Err(err) = self.state.settle_taxes(&ledger) {
            return Err(self.fail(err.into()));
        }
        for rank in Rank::ORDERED {
            let payment = ledger.payment(rank).unwrap_or_default();
            debug!(rank = rank.abbreviation(), cards = %format_cards(payment), "tax paid");
        }

        if leader == PlayerId::Person {
            self.state.set_phase(Phase::Ongoing);
            info!("taxes exchanged; Person leads");
        } else {
            self.state.set_phase(Phase::Ready);
            info!(leader = %leader, "taxes exchanged");
        }
        Ok(())
    }

    pub fn start_round(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        self.require_phase(Phase::Ready, "start the round")?;
        self.state.set_revolution_caller(None);
        self.state.set_phase(Phase::Ongoing);
        self.scheduler.schedule(Step::Turn, Pace::Immediate);
        self.drive()
    }

    /// Queues a turn for an adopted state that is mid-game.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        if self.state.phase() == Phase::Ongoing && self.scheduler.pending() == 0 {
            self.scheduler.schedule(Step::Turn, Pace::Immediate);
        }
        self.drive()
    }

    pub fn toggle_card_selection(&mut self, index: usize) -> Result<bool, EngineError> {
        self.guard()?;
        self.require_persons_turn("select cards")?;
        self.toggle_person_card(index)
    }

    pub fn clear_selection(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        self.require_persons_turn("clear the selection")?;
        self.state.selection_mut().clear();
        Ok(())
    }

    pub fn submit_play(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        self.require_persons_turn("play")?;

        let cards = self.state.selected_cards();
        if cards.is_empty() {
            return Err(self.reject(Rejection::EmptySelection));
        }
        if let Err(err) = check_play(&cards, self.state.table()) {
            if err.is_internal() {
                return Err(self.fail(Fault::MalformedPlay(err)));
            }
            return Err(self.reject(Rejection::IllegalPlay(err)));
        }

        self.record_move(PlayerId::Person, cards, false)?;
        self.scheduler.schedule(Step::Turn, Pace::Presentation);
        self.drive()
    }

    /// Passes the turn; during taxes a Merchant uses this to pay nothing.
    pub fn submit_pass(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        if self.state.phase() != Phase::Taxes {
            self.require_persons_turn("pass")?;
        }
        if !self.state.selection().is_empty() {
            return Err(self.reject(Rejection::SelectionNotEmpty));
        }
        if self.state.phase() == Phase::Taxes {
            return self.submit_taxes();
        }

        self.record_move(PlayerId::Person, Vec::new(), false)?;
        self.scheduler.schedule(Step::Turn, Pace::Presentation);
        self.drive()
    }

    /// Takes the next continuation so a UI timer can run it after `step.pace`.
    pub fn next_step(&mut self) -> Option<ScheduledStep> {
        self.scheduler.pop()
    }

    pub fn execute(&mut self, scheduled: ScheduledStep) -> Result<StepOutcome, EngineError> {
        if !self.scheduler.is_current(scheduled.token) {
            warn!(
                token = scheduled.token.value(),
                current = self.token().value(),
                step = ?scheduled.step,
                "dropping continuation from a previous game"
            );
            return Ok(StepOutcome::Stale);
        }
        self.guard()?;

        let result = match scheduled.step {
            Step::Turn => self.run_turn(),
            Step::FinishGame => {
                self.finish_game();
                Ok(())
            }
        };
        match result {
            Ok(()) => Ok(StepOutcome::Executed),
            Err(fault) => Err(self.fail(fault)),
        }
    }

    /// Runs queued continuations until the engine waits on Person or the game ends.
    pub fn pump(&mut self) -> Result<usize, EngineError> {
        let mut executed = 0;
        while let Some(scheduled) = self.scheduler.pop() {
            self.pacing.pause(scheduled.pace);
            if self.execute(scheduled)? == StepOutcome::Executed {
                executed += 1;
            }
        }
        Ok(executed)
    }

    fn drive(&mut self) -> Result<(), EngineError> {
        if self.options.drive == Drive::Eager {
            self.pump()?;
        }
        Ok(())
    }

    fn run_turn(&mut self) -> Result<(), Fault> {
        if self.state.everyone_finished() {
            self.state.archive_round();
            self.state.set_up_next(None);
            self.scheduler.schedule(Step::FinishGame, Pace::Presentation);
            return Ok(());
        }

        if self.state.round().everyone_passed() {
            let closed = self.state.round().len();
            self.state.archive_round();
            info!(moves = closed, rounds = self.state.history().len(), "round closed");
        }

        let player = self.state.up_next().ok_or(Fault::MissingTurn)?;
        if self.state.is_out(player) {
            self.apply_and_advance(player, Vec::new(), true)?;
            self.scheduler.schedule(Step::Turn, Pace::Immediate);
            return Ok(());
        }

        let autopilot = self.state.all_bots_finished() && self.options.autoplay_person_when_alone;
        if player == PlayerId::Person && !autopilot {
            return Ok(());
        }

        let cards = {
            let ctx = PolicyContext {
                player,
                rank: self.state.rank_of(player),
                hand: self.state.hand(player),
                table: self.state.table(),
            };
            self.policy
                .choose_play(&ctx)
                .map_err(|source| Fault::Planner { player, source })?
        };
        check_play(&cards, self.state.table()).map_err(|source| Fault::InvalidBotMove {
            player,
            cards: cards.clone(),
            source,
        })?;

        self.apply_and_advance(player, cards, false)?;
        self.scheduler.schedule(Step::Turn, Pace::Presentation);
        Ok(())
    }

    fn finish_game(&mut self) {
        self.state.set_phase(Phase::Over);
        let order = self
            .state
            .finish_order()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        info!(
            score = self.state.score().points(),
            finish_order = %order,
            moves = self.state.next_sequence() - 1,
            "game over"
        );
    }

    fn record_move(
        &mut self,
        player: PlayerId,
        cards: Vec<CardValue>,
        auto_pass: bool,
    ) -> Result<(), EngineError> {
        self.apply_and_advance(player, cards, auto_pass)
            .map_err(|fault| self.fail(fault))
    }

    /// Applies a checked move and hands the turn to the next seat.
    fn apply_and_advance(
        &mut self,
        player: PlayerId,
        cards: Vec<CardValue>,
        auto_pass: bool,
    ) -> Result<(), Fault> {
        let shown = format_cards(&cards);
        let outcome = self.state.apply_move(player, cards, auto_pass)?;
        self.state.set_up_next(Some(player.next()));

        if !auto_pass {
            debug!(sequence = outcome.sequence, player = %player, cards = %shown, "move");
        }
        if let Some(position) = outcome.finished_at {
            info!(player = %player, position, "player went out");
        }
        if outcome.score_captured {
            info!(score = self.state.score().points(), "score captured");
        }
        Ok(())
    }

    fn toggle_person_card(&mut self, index: usize) -> Result<bool, EngineError> {
        let hand = self.state.hand(PlayerId::Person).clone();
        let toggled = self.state.selection_mut().toggle(index, &hand);
        toggled.map_err(|err| self.reject(err.into()))
    }

    fn guard(&self) -> Result<(), EngineError> {
        match self.fault {
            Some(_) => Err(EngineError::Fatal(Fault::Aborted)),
            None => Ok(()),
        }
    }

    fn require_phase(&self, phase: Phase, intent: &'static str) -> Result<(), EngineError> {
        if self.state.phase() != phase {
            return Err(self.reject(Rejection::WrongPhase {
                intent,
                phase: self.state.phase(),
            }));
        }
        Ok(())
    }

    fn require_persons_turn(&self, intent: &'static str) -> Result<(), EngineError> {
        self.require_phase(Phase::Ongoing, intent)?;
        let up_next = self.state.up_next();
        if up_next != Some(PlayerId::Person) || self.scheduler.pending() > 0 {
            return Err(self.reject(Rejection::NotYourTurn { up_next }));
        }
        Ok(())
    }

    fn reject(&self, rejection: Rejection) -> EngineError {
        warn!(%rejection, phase = %self.state.phase(), "intent rejected");
        EngineError::Rejected(rejection)
    }

    fn fail(&mut self, fault: Fault) -> EngineError {
        error!(%fault, phase = %self.state.phase(), "game aborted");
        self.scheduler.clear();
        self.fault = Some(fault.clone());
        EngineError::Fatal(fault)
    }

    fn log_new_game(&self) {
        info!(
            token = self.token().value(),
            person_rank = self.state.rank_of(PlayerId::Person).abbreviation(),
            "new game dealt"
        );
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

fn random_ranks(rng: &mut StdRng) -> RankAssignment {
    let person = Rank::from_index(rng.gen_range(0..Rank::ORDERED.len())).unwrap_or(Rank::Merchant);
    RankAssignment::rotated_from(person)
}
