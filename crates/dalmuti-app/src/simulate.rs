use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use dalmuti_bot::{HeuristicPolicy, PlanError, Policy, PolicyContext};
use dalmuti_core::AppInfo;
use dalmuti_core::game::selection::Selection;
use dalmuti_core::game::state::Phase;
use dalmuti_core::model::card::CardValue;
use dalmuti_core::model::player::PlayerId;
use dalmuti_core::model::rank::Rank;
use dalmuti_core::model::tax::TaxDecision;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::{ResolvedOutputs, SimulationConfig};
use crate::controller::{ControllerSnapshot, EngineOptions, GameController};
use crate::error::EngineError;
use crate::scheduler::{NoPacing, Pacing, SleepPacing};

/// Plays whole games headlessly with Person driven by the bot heuristic.
pub struct SimulationRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub mean_score: f64,
    pub revolutions: usize,
    pub last_snapshot: ControllerSnapshot,
}

/// How a single simulated game went for Person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub game_index: usize,
    pub start_rank: Rank,
    pub finish_rank: Rank,
    pub kept_rank: bool,
    pub score: u32,
    pub finish_order: Vec<PlayerId>,
    pub revolution: Option<Rank>,
    pub moves: u32,
    pub rounds: usize,
}

#[derive(Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    seed: u64,
    #[serde(flatten)]
    record: &'a GameRecord,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Execute every configured game, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, SimulationError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let seed = self.config.games.seed.unwrap_or(0);
        let options = EngineOptions {
            autoplay_person_when_alone: self.config.engine.autoplay_person_when_alone,
            ..EngineOptions::default()
        };
        let pacing: Box<dyn Pacing> = match self.config.engine.pacing_ms {
            0 => Box::new(NoPacing),
            ms => Box::new(SleepPacing::new(Duration::from_millis(ms))),
        };
        let mut controller = GameController::with_options(seed, options).with_pacing(pacing);
        let mut person = HeuristicPolicy::new();

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut records = Vec::with_capacity(self.config.games.count);
        for game_index in 0..self.config.games.count {
            if game_index > 0 {
                controller.reset(self.config.games.continue_ranks);
            }
            let record = self.play_game(&mut controller, &mut person, game_index)?;
            info!(
                game_index,
                score = record.score,
                finish_rank = record.finish_rank.abbreviation(),
                moves = record.moves,
                "simulated game complete"
            );

            let row = GameLogRow {
                run_id: &self.config.run_id,
                seed,
                record: &record,
            };
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            records.push(record);
        }
        writer.flush()?;

        write_summary(&self.outputs.summary_md, &self.config.run_id, &records)?;

        let total: u64 = records.iter().map(|r| u64::from(r.score)).sum();
        Ok(RunSummary {
            games_played: records.len(),
            rows_written: records.len(),
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            mean_score: total as f64 / records.len().max(1) as f64,
            revolutions: records.iter().filter(|r| r.revolution.is_some()).count(),
            last_snapshot: controller.snapshot(),
        })
    }

    fn play_game(
        &self,
        controller: &mut GameController,
        person: &mut HeuristicPolicy,
        game_index: usize,
    ) -> Result<GameRecord, SimulationError> {
        let start_rank = controller.state().rank_of(PlayerId::Person);
        let limit = self.config.engine.max_moves_per_game;
        let mut revolution = None;

        loop {
            let moves = controller.state().next_sequence() - 1;
            if moves > limit {
                return Err(SimulationError::MoveLimit { game_index, limit });
            }
            let engine = |source| SimulationError::Engine { game_index, source };

            match controller.state().phase() {
                Phase::Taxes => {
                    let decision =
                        person_decision(controller, person, |policy, ctx| policy.choose_tax(ctx))?;
                    let cards = match decision {
                        TaxDecision::Revolution => vec![CardValue::JESTER; 2],
                        TaxDecision::Pay(cards) => cards,
                    };
                    for index in selection_for(controller, &cards, game_index)?.indices() {
                        controller.select_tax_card(index).map_err(engine)?;
                    }
                    if cards.is_empty() {
                        controller.submit_pass().map_err(engine)?;
                    } else {
                        controller.submit_taxes().map_err(engine)?;
                    }
                    revolution = controller.state().revolution_caller();
                }
                Phase::Ready => controller.start_round().map_err(engine)?,
                Phase::Ongoing => {
                    let state = controller.state();
                    if state.up_next() != Some(PlayerId::Person) || controller.pending_steps() > 0 {
                        return Err(SimulationError::Stalled {
                            game_index,
                            up_next: state.up_next(),
                        });
                    }
                    let cards =
                        person_decision(controller, person, |policy, ctx| policy.choose_play(ctx))?;
                    if cards.is_empty() {
                        controller.submit_pass().map_err(engine)?;
                    } else {
                        for index in selection_for(controller, &cards, game_index)?.indices() {
                            controller.toggle_card_selection(index).map_err(engine)?;
                        }
                        controller.submit_play().map_err(engine)?;
                    }
                }
                Phase::Over => break,
            }
        }

        let state = controller.state();
        let finish_rank = state
            .finish_position(PlayerId::Person)
            .and_then(Rank::from_index)
            .ok_or(SimulationError::Unfinished { game_index })?;
        Ok(GameRecord {
            game_index,
            start_rank,
            finish_rank,
            kept_rank: start_rank == finish_rank,
            score: state.score().points(),
            finish_order: state.finish_order().to_vec(),
            revolution,
            moves: state.next_sequence() - 1,
            rounds: state.history().len(),
        })
    }
}

/// Asks Person's planner for a decision about the current state.
fn person_decision<T>(
    controller: &GameController,
    person: &mut HeuristicPolicy,
    decide: impl FnOnce(&mut HeuristicPolicy, &PolicyContext) -> Result<T, PlanError>,
) -> Result<T, SimulationError> {
    let state = controller.state();
    let ctx = PolicyContext {
        player: PlayerId::Person,
        rank: state.rank_of(PlayerId::Person),
        hand: state.hand(PlayerId::Person),
        table: state.table(),
    };
    Ok(decide(person, &ctx)?)
}

fn selection_for(
    controller: &GameController,
    cards: &[CardValue],
    game_index: usize,
) -> Result<Selection, SimulationError> {
    Selection::for_cards(controller.state().hand(PlayerId::Person), cards)
        .ok_or(SimulationError::Stalled {
            game_index,
            up_next: Some(PlayerId::Person),
        })
}

fn ensure_parent(path: Option<&Path>) -> Result<(), SimulationError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_summary(path: &Path, run_id: &str, records: &[GameRecord]) -> Result<(), SimulationError> {
    let games = records.len();
    let total: u64 = records.iter().map(|r| u64::from(r.score)).sum();
    let mean = total as f64 / games.max(1) as f64;
    let kept = records.iter().filter(|r| r.kept_rank).count();
    let revolutions = records.iter().filter(|r| r.revolution.is_some()).count();

    let mut md = String::new();
    md.push_str(&format!("# Simulation `{run_id}`\n\n"));
    md.push_str(&format!("_{} {}_\n\n", AppInfo::name(), AppInfo::version()));
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Games | {games} |\n"));
    md.push_str(&format!("| Mean score | {mean:.2} |\n"));
    md.push_str(&format!("| Kept rank | {kept} |\n"));
    md.push_str(&format!("| Revolutions | {revolutions} |\n\n"));

    md.push_str("## Finishing ranks\n\n");
    md.push_str("| Rank | Games |\n");
    md.push_str("|------|-------|\n");
    for rank in Rank::ORDERED {
        let count = records.iter().filter(|r| r.finish_rank == rank).count();
        md.push_str(&format!("| {rank} | {count} |\n"));
    }

    md.push_str("\n## Games\n\n");
    md.push_str("| # | Start | Finish | Score | Moves | Rounds | Revolution |\n");
    md.push_str("|---|-------|--------|-------|-------|--------|------------|\n");
    for record in records {
        md.push_str(&format!(
            "| {index} | {start} | {finish} | {score} | {moves} | {rounds} | {revolution} |\n",
            index = record.game_index,
            start = record.start_rank.abbreviation(),
            finish = record.finish_rank.abbreviation(),
            score = record.score,
            moves = record.moves,
            rounds = record.rounds,
            revolution = record.revolution.map(Rank::abbreviation).unwrap_or("-"),
        ));
    }

    fs::write(path, md)?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game {game_index}: {source}")]
    Engine {
        game_index: usize,
        #[source]
        source: EngineError,
    },
    #[error("Person's planner failed: {0}")]
    Planner(#[from] PlanError),
    #[error("game {game_index} exceeded {limit} moves")]
    MoveLimit { game_index: usize, limit: u32 },
    #[error("game {game_index} stopped waiting on {up_next:?}")]
    Stalled {
        game_index: usize,
        up_next: Option<PlayerId>,
    },
    #[error("game {game_index} ended without Person finishing")]
    Unfinished { game_index: usize },
}
