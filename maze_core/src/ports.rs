use std::collections::VecDeque;

use crate::{Direction, Position, entity::Item};

/// Failure raised by an input or display backend.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("I/O error in game frontend: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input closed")]
    Closed,
}

/// The abstract commands the game understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Quit,
}

/// Source of player commands.
///
/// Implementations block until the player supplies a valid command; raw input
/// that maps to nothing is filtered out by the adapter and never reaches the game.
pub trait InputPort {
    /// Returns the next movement or quit command.
    fn next_command(&mut self) -> Result<Command, PortError>;

    /// Asks whether to play again after a game has ended.
    fn ask_replay(&mut self) -> Result<bool, PortError>;
}

/// Receiver of observable game effects.
///
/// The game never consumes a value from these calls; an `Err` is a frontend
/// failure and aborts the run.
pub trait DisplayPort {
    /// Initial render of a playthrough, with items already placed.
    fn start(&mut self, items: &[Item], start: Position, exit: Position) -> Result<(), PortError>;

    fn move_player(&mut self, position: Position) -> Result<(), PortError>;

    fn item_collected(&mut self, name: &str, position: Position) -> Result<(), PortError>;

    fn show_end(&mut self, won: bool) -> Result<(), PortError>;

    /// Clears per-playthrough visual state before a replay.
    fn reset(&mut self) -> Result<(), PortError>;
}

/// A backend that both reads commands and shows their effects.
pub trait Frontend: InputPort + DisplayPort {}

impl<T: InputPort + DisplayPort + ?Sized> Frontend for T {}

/// Joins a separate input and display into one [`Frontend`].
pub struct PortPair<'a, I: ?Sized, D: ?Sized> {
    pub input: &'a mut I,
    pub display: &'a mut D,
}

impl<I: InputPort + ?Sized, D: ?Sized> InputPort for PortPair<'_, I, D> {
    fn next_command(&mut self) -> Result<Command, PortError> {
        self.input.next_command()
    }

    fn ask_replay(&mut self) -> Result<bool, PortError> {
        self.input.ask_replay()
    }
}

impl<I: ?Sized, D: DisplayPort + ?Sized> DisplayPort for PortPair<'_, I, D> {
    fn start(&mut self, items: &[Item], start: Position, exit: Position) -> Result<(), PortError> {
        self.display.start(items, start, exit)
    }

    fn move_player(&mut self, position: Position) -> Result<(), PortError> {
        self.display.move_player(position)
    }

    fn item_collected(&mut self, name: &str, position: Position) -> Result<(), PortError> {
        self.display.item_collected(name, position)
    }

    fn show_end(&mut self, won: bool) -> Result<(), PortError> {
        self.display.show_end(won)
    }

    fn reset(&mut self) -> Result<(), PortError> {
        self.display.reset()
    }
}

/// Input that plays back a fixed script.
///
/// Once the commands run out it answers `Quit`, and once the replay answers
/// run out it answers `false`, so a script can never block a game forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    commands: VecDeque<Command>,
    replays: VecDeque<bool>,
}

impl ScriptedInput {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            replays: VecDeque::new(),
        }
    }

    /// Convenience for a script made only of moves.
    pub fn moves(directions: impl IntoIterator<Item = Direction>) -> Self {
        Self::new(directions.into_iter().map(Command::Move))
    }

    pub fn with_replays(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.replays.extend(answers);
        self
    }

    /// Commands not yet handed out.
    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl InputPort for ScriptedInput {
    fn next_command(&mut self) -> Result<Command, PortError> {
        Ok(self.commands.pop_front().unwrap_or(Command::Quit))
    }

    fn ask_replay(&mut self) -> Result<bool, PortError> {
        Ok(self.replays.pop_front().unwrap_or(false))
    }
}

/// One recorded display notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Start {
        items: Vec<Item>,
        start: Position,
        exit: Position,
    },
    MovePlayer(Position),
    ItemCollected {
        name: String,
        position: Position,
    },
    ShowEnd {
        won: bool,
    },
    Reset,
}

/// Display that records every notification, for assertions in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub events: Vec<DisplayEvent>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of player moves shown so far.
    pub fn move_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DisplayEvent::MovePlayer(_)))
            .count()
    }

    /// Names of collected items, in pickup order.
    pub fn collected_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::ItemCollected { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Outcomes of every finished playthrough, in order.
    pub fn endings(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::ShowEnd { won } => Some(*won),
                _ => None,
            })
            .collect()
    }
}

impl DisplayPort for RecordingDisplay {
    fn start(&mut self, items: &[Item], start: Position, exit: Position) -> Result<(), PortError> {
        self.events.push(DisplayEvent::Start {
            items: items.to_vec(),
            start,
            exit,
        });
        Ok(())
    }

    fn move_player(&mut self, position: Position) -> Result<(), PortError> {
        self.events.push(DisplayEvent::MovePlayer(position));
        Ok(())
    }

    fn item_collected(&mut self, name: &str, position: Position) -> Result<(), PortError> {
        self.events.push(DisplayEvent::ItemCollected {
            name: name.to_string(),
            position,
        });
        Ok(())
    }

    fn show_end(&mut self, won: bool) -> Result<(), PortError> {
        self.events.push(DisplayEvent::ShowEnd { won });
        Ok(())
    }

    fn reset(&mut self) -> Result<(), PortError> {
        self.events.push(DisplayEvent::Reset);
        Ok(())
    }
}

/// Display that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl DisplayPort for NullDisplay {
    fn start(&mut self, _items: &[Item], _start: Position, _exit: Position) -> Result<(), PortError> {
        Ok(())
    }

    fn move_player(&mut self, _position: Position) -> Result<(), PortError> {
        Ok(())
    }

    fn item_collected(&mut self, _name: &str, _position: Position) -> Result<(), PortError> {
        Ok(())
    }

    fn show_end(&mut self, _won: bool) -> Result<(), PortError> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(), PortError> {
        Ok(())
    }
}
