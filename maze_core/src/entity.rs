use serde::{Deserialize, Serialize};

use crate::{Direction, Position};

/// The player token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
}

impl Player {
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    /// The coordinate one step away in `direction`, if it exists at all.
    /// Whether it is walkable is for the map to decide.
    pub fn target(&self, direction: Direction) -> Option<Position> {
        self.position.offset_by(direction)
    }
}

/// A collectible item.
///
/// Created unplaced from a configured name; its position is assigned by the
/// game at placement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub position: Option<Position>,
    pub collected: bool,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            collected: false,
        }
    }

    pub fn place(&mut self, position: Position) {
        self.position = Some(position);
    }

    pub fn collect(&mut self) {
        self.collected = true;
    }

    /// Marks the item uncollected for a new playthrough. The position is kept
    /// until the next placement overwrites it.
    pub fn reset(&mut self) {
        self.collected = false;
    }

    #[inline]
    pub fn is_at(&self, position: Position) -> bool {
        self.position == Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_target_uses_direction_offset() {
        let player = Player::new(Position::new(1, 1));
        assert_eq!(player.target(Direction::Right), Some(Position::new(2, 1)));
        assert_eq!(player.target(Direction::Up), Some(Position::new(1, 0)));
    }

    #[test]
    fn item_lifecycle() {
        let mut item = Item::new("Needle");
        assert!(!item.collected);
        assert!(!item.is_at(Position::new(0, 0)));

        item.place(Position::new(2, 3));
        assert!(item.is_at(Position::new(2, 3)));

        item.collect();
        assert!(item.collected);

        item.reset();
        assert!(!item.collected);
        assert_eq!(item.position, Some(Position::new(2, 3)));
    }
}
