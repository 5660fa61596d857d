use std::io::{BufRead, Write};

use maze_core::{
    Direction, Position,
    entity::Item,
    ports::{Command, DisplayPort, InputPort, PortError},
};

use crate::board::Board;

/// Maps a line of player input to a command.
pub fn parse_command(input: &str) -> Option<Command> {
    let command = match input.trim().to_lowercase().as_str() {
        "w" | "up" => Command::Move(Direction::Up),
        "s" | "down" => Command::Move(Direction::Down),
        "a" | "left" => Command::Move(Direction::Left),
        "d" | "right" => Command::Move(Direction::Right),
        "q" | "quit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Maps a line of player input to a yes/no answer.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" | "q" | "quit" => Some(false),
        _ => None,
    }
}

/// Plain text frontend: prints the board after every change and reads one
/// command per line.
pub struct TextUi<R, W> {
    reader: R,
    writer: W,
    board: Board,
}

impl<R: BufRead, W: Write> TextUi<R, W> {
    pub fn new(reader: R, writer: W, board: Board) -> Self {
        Self {
            reader,
            writer,
            board,
        }
    }

    #[cfg(test)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Reads one line; end of input means the player is gone.
    fn read_line(&mut self) -> Result<String, PortError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(PortError::Closed);
        }
        Ok(line)
    }

    fn prompt(&mut self, text: &str) -> Result<(), PortError> {
        write!(self.writer, "{text}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), PortError> {
        writeln!(self.writer)?;
        for row in self.board.rows() {
            writeln!(self.writer, "{row}")?;
        }
        if self.board.show_inventory() {
            writeln!(
                self.writer,
                "Inventory ({}/{}): {}",
                self.board.inventory().len(),
                self.board.total_items(),
                self.board.inventory().join(", ")
            )?;
        }
        if !self.board.message().is_empty() {
            writeln!(self.writer, "{}", self.board.message())?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> InputPort for TextUi<R, W> {
    fn next_command(&mut self) -> Result<Command, PortError> {
        loop {
            self.prompt("Move (w/a/s/d, q to quit): ")?;
            let line = self.read_line()?;
            match parse_command(&line) {
                Some(command) => return Ok(command),
                None => writeln!(self.writer, "Unknown command: {}", line.trim())?,
            }
        }
    }

    fn ask_replay(&mut self) -> Result<bool, PortError> {
        loop {
            let end_text = self.board.end_text().to_string();
            self.prompt(&format!("{end_text} "))?;
            let line = self.read_line()?;
            if let Some(answer) = parse_answer(&line) {
                return Ok(answer);
            }
        }
    }
}

impl<R: BufRead, W: Write> DisplayPort for TextUi<R, W> {
    fn start(&mut self, items: &[Item], start: Position, _exit: Position) -> Result<(), PortError> {
        self.board.start(items, start);
        self.draw()
    }

    fn move_player(&mut self, position: Position) -> Result<(), PortError> {
        self.board.move_player(position);
        self.draw()
    }

    fn item_collected(&mut self, name: &str, position: Position) -> Result<(), PortError> {
        self.board.collect(name, position);
        writeln!(self.writer, "{}", self.board.message())?;
        Ok(())
    }

    fn show_end(&mut self, won: bool) -> Result<(), PortError> {
        self.board.end(won);
        writeln!(self.writer, "\n{}", self.board.message())?;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), PortError> {
        self.board.reset();
        Ok(())
    }
}
