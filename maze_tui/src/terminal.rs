use std::io::{self, Stdout};

use maze_core::{
    Direction, Position,
    entity::Item,
    ports::{Command, DisplayPort, InputPort, PortError},
};
use ratatui::{
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};

use crate::board::{Board, Cell};

/// Maps a key press during play to a command.
pub fn command_for_key(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Command::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Command::Move(Direction::Right)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Maps a key press at the end banner to a replay answer.
pub fn answer_for_key(code: KeyCode) -> Option<bool> {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc => Some(false),
        _ => None,
    }
}

/// Full-screen ratatui frontend. Restores the terminal when dropped.
pub struct TerminalUi {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    board: Board,
}

impl TerminalUi {
    pub fn new(board: Board) -> io::Result<Self> {
        Ok(Self {
            terminal: setup_terminal()?,
            board,
        })
    }

    fn draw(&mut self) -> Result<(), PortError> {
        let board = &self.board;
        self.terminal.draw(|frame| ui(frame, board))?;
        Ok(())
    }

    /// Blocks until a key is pressed. Resizes trigger a redraw.
    fn next_key(&mut self) -> Result<KeyCode, PortError> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(key.code),
                Event::Resize(_, _) => self.draw()?,
                _ => {}
            }
        }
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        if let Err(err) = restore_terminal(&mut self.terminal) {
            log::error!("Failed to restore terminal: {err}");
        }
    }
}

impl InputPort for TerminalUi {
    fn next_command(&mut self) -> Result<Command, PortError> {
        loop {
            if let Some(command) = command_for_key(self.next_key()?) {
                return Ok(command);
            }
        }
    }

    fn ask_replay(&mut self) -> Result<bool, PortError> {
        loop {
            if let Some(answer) = answer_for_key(self.next_key()?) {
                return Ok(answer);
            }
        }
    }
}

impl DisplayPort for TerminalUi {
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
        self.draw()
    }

    fn show_end(&mut self, won: bool) -> Result<(), PortError> {
        self.board.end(won);
        self.draw()
    }

    fn reset(&mut self) -> Result<(), PortError> {
        self.board.reset();
        self.draw()
    }
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Renders the board.
fn ui(frame: &mut Frame, board: &Board) {
    let constraints = if board.show_inventory() {
        vec![
            Constraint::Percentage(70), // Map
            Constraint::Percentage(20), // Inventory
            Constraint::Percentage(10), // Status/help
        ]
    } else {
        vec![Constraint::Percentage(85), Constraint::Percentage(15)]
    };
    let main_layout = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_map(frame, main_layout[0], board);
    if board.show_inventory() {
        render_inventory(frame, main_layout[1], board);
    }
    render_status(frame, main_layout[main_layout.len() - 1], board);
}

fn cell_style(cell: Cell) -> Style {
    match cell {
        Cell::Player => Style::default().fg(Color::Red).bold(),
        Cell::Wall => Style::default().fg(Color::DarkGray),
        Cell::Exit => Style::default().fg(Color::Green).bold(),
        Cell::Item(_) => Style::default().fg(Color::Yellow),
        Cell::Floor | Cell::Void => Style::default(),
    }
}

fn render_map(frame: &mut Frame, area: Rect, board: &Board) {
    let lines: Vec<Line> = (0..board.height())
        .map(|y| {
            let spans: Vec<Span> = (0..board.width())
                .map(|x| {
                    let cell = board.cell(Position::new(x, y));
                    Span::styled(cell.glyph().to_string(), cell_style(cell))
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let map_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Maze").borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(map_paragraph, area);
}

fn render_inventory(frame: &mut Frame, area: Rect, board: &Board) {
    let entries: Vec<ListItem> = board
        .inventory()
        .iter()
        .map(|name| ListItem::new(Span::styled(name.clone(), Style::default().fg(Color::Yellow))))
        .collect();
    let title = format!(
        "Inventory {}/{}",
        board.inventory().len(),
        board.total_items()
    );
    let inventory_widget =
        List::new(entries).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(inventory_widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, board: &Board) {
    let mut lines = vec![Line::from(board.message().to_string())];
    match board.ended() {
        Some(won) => {
            let color = if won { Color::Green } else { Color::Red };
            lines[0] = Line::styled(board.message().to_string(), Style::default().fg(color).bold());
            lines.push(Line::from(board.end_text().to_string()));
        }
        None => lines.push(Line::from("Arrows/WASD to move, 'q' or 'Esc' to quit.")),
    }
    let status = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, area);
}
