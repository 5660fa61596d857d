use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Direction, Position,
    config::{ConfigError, GameConfig},
    entity::{Item, Player},
    map::{MapFormatError, MapGrid},
    ports::{Command, DisplayPort, Frontend, InputPort, PortError, PortPair},
};

/// Represents errors that stop a game from launching or continuing.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Map(#[from] MapFormatError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Not enough free tiles to place {items} items: only {available} available")]
    InsufficientSpace { items: usize, available: usize },
    #[error("Cannot place an item at {0}: not a free walkable tile")]
    InvalidPlacement(Position),
    #[error("Expected {expected} item positions, got {got}")]
    PlacementCount { expected: usize, got: usize },
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Where the current playthrough stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Won,
    Lost,
}

/// The orchestrator's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput,
    Won,
    Lost,
    Terminated,
}

/// Result of applying one directional command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Target was not walkable; nothing changed and nothing was shown.
    Rejected,
    Moved {
        /// Names of the items picked up by this move.
        collected: Vec<String>,
        status: SessionStatus,
    },
}

/// Tally of finished playthroughs over one [`GameState::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub games_played: u64,
    pub wins: u64,
    pub losses: u64,
}

impl RunSummary {
    fn record(&mut self, won: bool) {
        self.games_played = self.games_played.saturating_add(1);
        if won {
            self.wins = self.wins.saturating_add(1);
        } else {
            self.losses = self.losses.saturating_add(1);
        }
    }
}

/// Owns the map, the player and the items, and drives the turn loop.
#[derive(Debug)]
pub struct GameState<R = StdRng> {
    map: MapGrid,
    player: Player,
    items: Vec<Item>,
    rng: R,
    phase: Phase,
    running: bool,
    moves: u64,
}

impl GameState<StdRng> {
    /// Creates a game whose placements are seeded from the OS.
    pub fn from_os_rng(map: MapGrid, config: &GameConfig) -> Result<Self, GameError> {
        Self::new(map, config, StdRng::from_os_rng())
    }

    /// Creates a game whose placements are reproducible from `seed`.
    pub fn seeded(map: MapGrid, config: &GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::new(map, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Builds the items from `config`, puts the player on the start tile and
    /// performs the first placement.
    pub fn new(map: MapGrid, config: &GameConfig, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        let player = Player::new(map.start());
        let items = config.item_names.iter().map(Item::new).collect();
        let mut game = GameState {
            map,
            player,
            items,
            rng,
            phase: Phase::AwaitingInput,
            running: true,
            moves: 0,
        };
        game.place_items()?;
        info!(
            "New game on {}x{} map with {} items",
            game.map.width(),
            game.map.height(),
            game.items.len()
        );
        Ok(game)
    }

    /// Returns the map being played.
    pub fn map(&self) -> &MapGrid {
        &self.map
    }

    /// Returns the player token.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Returns the items in configured order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the current state of the turn loop.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// False once the player has quit or declined to replay.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Accepted moves in the current playthrough.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Checks if every item has been picked up this playthrough.
    pub fn all_collected(&self) -> bool {
        self.items.iter().all(|item| item.collected)
    }

    /// Returns whether the playthrough is still going, won or lost.
    pub fn status(&self) -> SessionStatus {
        if self.player.position != self.map.exit() {
            SessionStatus::InProgress
        } else if self.all_collected() {
            SessionStatus::Won
        } else {
            SessionStatus::Lost
        }
    }

    /// Assigns every item a distinct random tile among the walkable tiles
    /// other than start and exit.
    pub fn place_items(&mut self) -> Result<(), GameError> {
        let mut candidates = self.map.placement_candidates();
        if candidates.len() < self.items.len() {
            return Err(GameError::InsufficientSpace {
                items: self.items.len(),
                available: candidates.len(),
            });
        }
        for item in &mut self.items {
            let index = self.rng.random_range(0..candidates.len());
            item.place(candidates.swap_remove(index));
            debug!("Placed {} at {:?}", item.name, item.position);
        }
        Ok(())
    }

    /// Places the items at fixed positions, in item order.
    ///
    /// Each position must be a walkable tile other than start and exit.
    /// Positions may repeat; coinciding items are all collected on the same move.
    pub fn place_items_at(&mut self, positions: &[Position]) -> Result<(), GameError> {
        if positions.len() != self.items.len() {
            return Err(GameError::PlacementCount {
                expected: self.items.len(),
                got: positions.len(),
            });
        }
        if let Some(&bad) = positions.iter().find(|&&pos| {
            !self.map.is_walkable(pos) || pos == self.map.start() || pos == self.map.exit()
        }) {
            return Err(GameError::InvalidPlacement(bad));
        }
        for (item, &pos) in self.items.iter_mut().zip(positions) {
            item.place(pos);
        }
        Ok(())
    }

    /// Resolves one directional command.
    ///
    /// A move onto a non-walkable coordinate, or any move once the playthrough
    /// is over, is rejected without touching state or the display.
    pub fn apply_move<D>(&mut self, direction: Direction, display: &mut D) -> Result<MoveOutcome, PortError>
    where
        D: DisplayPort + ?Sized,
    {
        if self.phase != Phase::AwaitingInput {
            return Ok(MoveOutcome::Rejected);
        }
        let Some(target) = self
            .player
            .target(direction)
            .filter(|&pos| self.map.is_walkable(pos))
        else {
            debug!("Rejected move {:?} from {}", direction, self.player.position);
            return Ok(MoveOutcome::Rejected);
        };

        self.player.position = target;
        self.moves = self.moves.saturating_add(1);
        display.move_player(target)?;

        let mut collected = Vec::new();
        for item in self
            .items
            .iter_mut()
            .filter(|item| !item.collected && item.is_at(target))
        {
            item.collect();
            display.item_collected(&item.name, target)?;
            debug!("Collected {} at {}", item.name, target);
            collected.push(item.name.clone());
        }

        let status = self.status();
        match status {
            SessionStatus::InProgress => {}
            SessionStatus::Won => self.phase = Phase::Won,
            SessionStatus::Lost => self.phase = Phase::Lost,
        }
        Ok(MoveOutcome::Moved { collected, status })
    }

    /// Prepares a fresh playthrough: uncollects every item, returns the player
    /// to the start tile, places the items again and redraws.
    pub fn reset<D>(&mut self, display: &mut D) -> Result<(), GameError>
    where
        D: DisplayPort + ?Sized,
    {
        for item in &mut self.items {
            item.reset();
        }
        display.reset()?;
        self.player.position = self.map.start();
        self.moves = 0;
        self.place_items()?;
        self.phase = Phase::AwaitingInput;
        display.start(&self.items, self.map.start(), self.map.exit())?;
        Ok(())
    }

    fn terminate(&mut self) {
        self.running = false;
        self.phase = Phase::Terminated;
    }

    /// Runs playthroughs until the player quits or declines a replay.
    pub fn run<I, D>(&mut self, input: &mut I, display: &mut D) -> Result<RunSummary, GameError>
    where
        I: InputPort + ?Sized,
        D: DisplayPort + ?Sized,
    {
        self.run_frontend(&mut PortPair { input, display })
    }

    /// Same as [`GameState::run`] for a backend that serves both ports.
    pub fn run_frontend<F>(&mut self, frontend: &mut F) -> Result<RunSummary, GameError>
    where
        F: Frontend + ?Sized,
    {
        let mut summary = RunSummary::default();
        if !self.running {
            return Ok(summary);
        }
        frontend.start(&self.items, self.map.start(), self.map.exit())?;

        while self.running {
            let direction = match frontend.next_command()? {
                Command::Quit => {
                    info!("Player quit after {} moves", self.moves);
                    self.terminate();
                    break;
                }
                Command::Move(direction) => direction,
            };

            let won = match self.apply_move(direction, frontend)? {
                MoveOutcome::Rejected => continue,
                MoveOutcome::Moved { status, .. } => match status {
                    SessionStatus::InProgress => continue,
                    SessionStatus::Won => true,
                    SessionStatus::Lost => false,
                },
            };

            info!(
                "Game {} in {} moves",
                if won { "won" } else { "lost" },
                self.moves
            );
            summary.record(won);
            frontend.show_end(won)?;

            if frontend.ask_replay()? {
                self.reset(frontend)?;
            } else {
                self.terminate();
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::ports::{DisplayEvent, NullDisplay, RecordingDisplay, ScriptedInput};

    fn config(names: &[&str]) -> GameConfig {
        GameConfig {
            item_names: names.iter().map(|n| n.to_string()).collect(),
            ..GameConfig::default()
        }
    }

    fn map(text: &str) -> MapGrid {
        MapGrid::load(text, &GameConfig::default().symbols).unwrap()
    }

    #[test]
    fn placement_is_distinct_and_avoids_start_and_exit() {
        let game = GameState::seeded(map("S....\n.....\n....K"), &config(&["A", "B", "C", "D"]), 7)
            .unwrap();
        let positions: HashSet<Position> =
            game.items().iter().filter_map(|item| item.position).collect();
        assert_eq!(positions.len(), 4);
        assert!(!positions.contains(&game.map().start()));
        assert!(!positions.contains(&game.map().exit()));
        assert!(positions.iter().all(|pos| game.map().is_walkable(*pos)));
    }

    #[test]
    fn placement_fills_exactly_enough_space() {
        let game = GameState::seeded(map("S..K"), &config(&["A", "B"]), 1).unwrap();
        let mut positions: Vec<Position> =
            game.items().iter().filter_map(|item| item.position).collect();
        positions.sort();
        assert_eq!(positions, vec![Position::new(1, 0), Position::new(2, 0)]);
    }

    #[test]
    fn insufficient_space_is_fatal() {
        let err = GameState::seeded(map("S.K"), &config(&["A", "B"]), 1).unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientSpace {
                items: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn same_seed_same_placement() {
        let names = config(&["A", "B", "C"]);
        let first = GameState::seeded(map("S.....\n......\n.....K"), &names, 42).unwrap();
        let second = GameState::seeded(map("S.....\n......\n.....K"), &names, 42).unwrap();
        assert_eq!(first.items(), second.items());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = GameState::seeded(map("S..K"), &config(&["A", "A"]), 1).unwrap_err();
        assert!(matches!(err, GameError::Config(ConfigError::DuplicateItem { .. })));
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut game = GameState::seeded(map("#S.K"), &config(&[]), 1).unwrap();
        let mut display = RecordingDisplay::new();

        assert_eq!(game.apply_move(Direction::Left, &mut display).unwrap(), MoveOutcome::Rejected);
        assert_eq!(game.apply_move(Direction::Up, &mut display).unwrap(), MoveOutcome::Rejected);
        assert_eq!(game.player().position, Position::new(1, 0));
        assert_eq!(game.moves(), 0);
        assert!(display.events.is_empty());
    }

    #[test]
    fn reaching_exit_with_missing_item_loses() {
        let mut game = GameState::seeded(map("S.K\n..."), &config(&["A"]), 1).unwrap();
        game.place_items_at(&[Position::new(1, 1)]).unwrap();
        let mut display = NullDisplay;

        game.apply_move(Direction::Right, &mut display).unwrap();
        let outcome = game.apply_move(Direction::Right, &mut display).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                collected: vec![],
                status: SessionStatus::Lost
            }
        );
        assert_eq!(game.phase(), Phase::Lost);
        assert_eq!(game.apply_move(Direction::Left, &mut display).unwrap(), MoveOutcome::Rejected);
    }

    #[test]
    fn coinciding_items_collect_together() {
        let mut game = GameState::seeded(map("S..K"), &config(&["A", "B"]), 1).unwrap();
        game.place_items_at(&[Position::new(1, 0), Position::new(1, 0)]).unwrap();
        let mut display = RecordingDisplay::new();

        let outcome = game.apply_move(Direction::Right, &mut display).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                collected: vec!["A".to_string(), "B".to_string()],
                status: SessionStatus::InProgress
            }
        );
        assert!(game.all_collected());
        assert_eq!(display.collected_names(), vec!["A", "B"]);
    }

    #[test]
    fn fixed_placement_is_validated() {
        let mut game = GameState::seeded(map("S.#K"), &config(&["A"]), 1).unwrap();
        assert!(matches!(
            game.place_items_at(&[Position::new(2, 0)]),
            Err(GameError::InvalidPlacement(_))
        ));
        assert!(matches!(
            game.place_items_at(&[Position::new(0, 0)]),
            Err(GameError::InvalidPlacement(_))
        ));
        assert!(matches!(
            game.place_items_at(&[]),
            Err(GameError::PlacementCount { expected: 1, got: 0 })
        ));
    }

    #[test]
    fn reset_uncollects_and_restarts() {
        let mut game = GameState::seeded(map("S.K"), &config(&["A"]), 3).unwrap();
        let mut display = RecordingDisplay::new();
        game.apply_move(Direction::Right, &mut display).unwrap();
        game.apply_move(Direction::Right, &mut display).unwrap();
        assert_eq!(game.phase(), Phase::Won);

        game.reset(&mut display).unwrap();
        assert!(game.items().iter().all(|item| !item.collected));
        assert_eq!(game.player().position, game.map().start());
        assert_eq!(game.phase(), Phase::AwaitingInput);
        assert_eq!(game.moves(), 0);
        assert!(matches!(
            display.events.as_slice(),
            [.., DisplayEvent::Reset, DisplayEvent::Start { .. }]
        ));
    }

    #[test]
    fn summary_counters_saturate() {
        let mut summary = RunSummary {
            games_played: u64::MAX,
            wins: u64::MAX,
            losses: 0,
        };
        summary.record(true);
        summary.record(false);
        assert_eq!(summary.games_played, u64::MAX);
        assert_eq!(summary.wins, u64::MAX);
        assert_eq!(summary.losses, 1);
    }

    #[test]
    fn quit_terminates_and_further_runs_are_noops() {
        let mut game = GameState::seeded(map("S.K"), &config(&[]), 1).unwrap();
        let mut input = ScriptedInput::new([Command::Quit, Command::Move(Direction::Right)]);
        let mut display = RecordingDisplay::new();

        let summary = game.run(&mut input, &mut display).unwrap();
        assert_eq!(summary, RunSummary::default());
        assert!(!game.is_running());
        assert_eq!(game.phase(), Phase::Terminated);

        game.run(&mut input, &mut display).unwrap();
        assert_eq!(input.remaining(), 1);
    }
}
