use std::{
    collections::{BTreeSet, VecDeque},
    ops::{Index, IndexMut},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Direction, Position, config::SymbolTable};

/// Represents errors that can occur while parsing a map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapFormatError {
    #[error("Map text is empty")]
    Empty,
    #[error("No start tile found in map")]
    MissingStart,
    #[error("No exit tile found in map")]
    MissingExit,
    #[error("Multiple start tiles found: {first} and {second}")]
    DuplicateStart { first: Position, second: Position },
    #[error("Multiple exit tiles found: {first} and {second}")]
    DuplicateExit { first: Position, second: Position },
}

/// A generic 2D grid structure.
///
/// Stores elements of type `T` in a flat vector using row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a new grid with the specified dimensions, filled with default values.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Self
    where
        T: Default + Clone,
    {
        let size = width.checked_mul(height).expect("Grid size overflow");
        Grid {
            width,
            height,
            cells: vec![T::default(); size],
        }
    }

    /// Returns the width of the grid.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height of the grid.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Converts (x, y) coordinates to a flat vector index.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[inline]
    pub fn coords_to_index(&self, x: usize, y: usize) -> Option<usize> {
        if self.is_valid(x, y) {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Checks if the given coordinates are within the grid boundaries.
    #[inline]
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Gets an immutable reference to the cell at the given coordinates.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.cells.get(self.coords_to_index(x, y)?)
    }

    /// Returns an iterator that yields `(Position, &T)` for each cell in row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = (Position, &T)> {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            (
                Position {
                    x: index % width,
                    y: index / width,
                },
                cell,
            )
        })
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: Position) -> &Self::Output {
        match self.coords_to_index(index.x, index.y) {
            Some(idx) => &self.cells[idx],
            None => panic!(
                "Grid index {} out of bounds for grid size ({}, {})",
                index, self.width, self.height
            ),
        }
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        let (width, height) = (self.width, self.height);
        match self.coords_to_index(index.x, index.y) {
            Some(idx) => &mut self.cells[idx],
            None => panic!(
                "Grid index {} out of bounds for grid size ({}, {})",
                index, width, height
            ),
        }
    }
}

/// The static class of a map cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Unrecognised character: neither wall nor floor, never reachable.
    #[default]
    Void,
    Wall,
    Floor,
    Start,
    Exit,
}

impl Tile {
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Floor | Tile::Start | Tile::Exit)
    }
}

/// Matches a raw map character against the symbol table, case-insensitively.
fn classify(symbols: &SymbolTable, ch: char) -> Option<Tile> {
    let mut upper = ch.to_uppercase();
    let ch = match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => return None,
    };
    if ch == symbols.wall {
        Some(Tile::Wall)
    } else if ch == symbols.floor {
        Some(Tile::Floor)
    } else if ch == symbols.start {
        Some(Tile::Start)
    } else if ch == symbols.exit {
        Some(Tile::Exit)
    } else {
        None
    }
}

/// The parsed, immutable maze.
///
/// Connectivity is not validated: a map may parse successfully with an exit
/// the player cannot reach. See [`MapGrid::exit_reachable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGrid {
    tiles: Grid<Tile>,
    walkable: BTreeSet<Position>,
    walls: BTreeSet<Position>,
    start: Position,
    exit: Position,
}

impl MapGrid {
    /// Parses a map from its textual form.
    ///
    /// Rows are separated by newlines and columns by character position. Each
    /// character is upper-cased and matched against `symbols`; anything else
    /// is void space. The width is one past the rightmost recognised column.
    pub fn load(text: &str, symbols: &SymbolTable) -> Result<MapGrid, MapFormatError> {
        if text.is_empty() {
            return Err(MapFormatError::Empty);
        }

        // lines() rather than split('\n'): a trailing newline is not an extra row
        // and "\r\n" endings are stripped.
        let rows: Vec<&str> = text.lines().collect();
        let height = rows.len();
        let mut width = 0;
        let mut parsed: Vec<(Position, Tile)> = Vec::new();
        let mut start: Option<Position> = None;
        let mut exit: Option<Position> = None;

        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let Some(tile) = classify(symbols, ch) else {
                    continue;
                };
                let pos = Position { x, y };
                match tile {
                    Tile::Start => {
                        if let Some(first) = start {
                            return Err(MapFormatError::DuplicateStart { first, second: pos });
                        }
                        start = Some(pos);
                    }
                    Tile::Exit => {
                        if let Some(first) = exit {
                            return Err(MapFormatError::DuplicateExit { first, second: pos });
                        }
                        exit = Some(pos);
                    }
                    _ => {}
                }
                width = width.max(x + 1);
                parsed.push((pos, tile));
            }
        }

        let start = start.ok_or(MapFormatError::MissingStart)?;
        let exit = exit.ok_or(MapFormatError::MissingExit)?;

        let mut tiles = Grid::new(width, height);
        let mut walkable = BTreeSet::new();
        let mut walls = BTreeSet::new();
        for (pos, tile) in parsed {
            tiles[pos] = tile;
            if tile.is_walkable() {
                walkable.insert(pos);
            } else {
                walls.insert(pos);
            }
        }

        debug!(
            "Loaded {}x{} map: {} walkable, {} walls, start {}, exit {}",
            width,
            height,
            walkable.len(),
            walls.len(),
            start,
            exit
        );

        Ok(MapGrid {
            tiles,
            walkable,
            walls,
            start,
            exit,
        })
    }

    /// Returns one past the rightmost recognised column.
    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    /// Returns the number of rows in the map text.
    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    /// Returns the player's starting tile.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Returns the keeper tile that ends a playthrough.
    pub fn exit(&self) -> Position {
        self.exit
    }

    /// Every tile the player may stand on: floor, start and exit.
    pub fn walkable(&self) -> &BTreeSet<Position> {
        &self.walkable
    }

    /// Every recognised tile the player may not enter.
    pub fn walls(&self) -> &BTreeSet<Position> {
        &self.walls
    }

    /// The dense tile layout, `width() x height()`, for renderers.
    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    /// Checks if the player may stand on `pos`.
    #[inline]
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.walkable.contains(&pos)
    }

    /// Walkable tiles an item may be placed on, in a stable order.
    pub fn placement_candidates(&self) -> Vec<Position> {
        self.walkable
            .iter()
            .copied()
            .filter(|&pos| pos != self.start && pos != self.exit)
            .collect()
    }

    /// Returns every walkable tile reachable from `origin` by 4-directional steps.
    ///
    /// Empty if `origin` itself is not walkable.
    pub fn reachable_from(&self, origin: Position) -> BTreeSet<Position> {
        let mut visited = BTreeSet::new();
        if !self.is_walkable(origin) {
            return visited;
        }

        let mut frontier = VecDeque::from([origin]);
        visited.insert(origin);
        while let Some(current) = frontier.pop_front() {
            for direction in Direction::ALL {
                let Some(next) = current.offset_by(direction) else {
                    continue;
                };
                if self.is_walkable(next) && visited.insert(next) {
                    frontier.push_back(next);
                }
            }
        }
        visited
    }

    /// Whether the exit can be reached from the start at all.
    pub fn exit_reachable(&self) -> bool {
        self.reachable_from(self.start).contains(&self.exit)
    }
}
