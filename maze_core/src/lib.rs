use serde::{Deserialize, Serialize};

pub mod config;
pub mod entity;
pub mod game;
pub mod map;
pub mod ports;

/// Represents a 2D coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    pub fn offset_by(self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.offset();
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four directions the player can step in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the `(dx, dy)` offset for this direction. Rows grow downwards.
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_by_follows_direction_table() {
        let origin = Position::new(3, 3);
        assert_eq!(origin.offset_by(Direction::Up), Some(Position::new(3, 2)));
        assert_eq!(origin.offset_by(Direction::Down), Some(Position::new(3, 4)));
        assert_eq!(origin.offset_by(Direction::Left), Some(Position::new(2, 3)));
        assert_eq!(origin.offset_by(Direction::Right), Some(Position::new(4, 3)));
    }

    #[test]
    fn offset_by_refuses_negative_coordinates() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.offset_by(Direction::Up), None);
        assert_eq!(corner.offset_by(Direction::Left), None);
    }
}
