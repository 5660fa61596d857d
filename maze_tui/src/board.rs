use maze_core::{
    Position,
    entity::Item,
    map::{Grid, MapGrid, Tile},
};

use crate::config::DisplayConfig;

/// What a single map cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Void,
    Wall,
    Floor,
    Exit,
    Player,
    Item(char),
}

impl Cell {
    pub fn glyph(self) -> char {
        match self {
            Cell::Void => ' ',
            Cell::Wall => '#',
            Cell::Floor => '.',
            Cell::Exit => 'K',
            Cell::Player => '@',
            Cell::Item(c) => c,
        }
    }
}

/// Drawn for items whose initial would read as a tile or the player.
const FALLBACK_ITEM_GLYPH: char = '*';

/// An item draws as the upper-cased first letter of its name, unless that
/// letter is already taken by a tile or the player.
fn item_glyph(name: &str) -> char {
    let reserved = [Cell::Void, Cell::Wall, Cell::Floor, Cell::Exit, Cell::Player].map(Cell::glyph);
    match name.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some(c) if c.is_ascii_graphic() && !reserved.contains(&c) => c,
        _ => FALLBACK_ITEM_GLYPH,
    }
}

/// Frontend-neutral view of the game, kept in sync by display notifications.
#[derive(Debug, Clone)]
pub struct Board {
    tiles: Grid<Tile>,
    texts: DisplayConfig,
    player: Position,
    /// Items still lying on the map.
    items: Vec<(String, Position)>,
    /// Items picked up this playthrough, in pickup order.
    inventory: Vec<String>,
    total_items: usize,
    message: String,
    ended: Option<bool>,
}

impl Board {
    pub fn new(map: &MapGrid, texts: DisplayConfig) -> Self {
        Board {
            tiles: map.tiles().clone(),
            texts,
            player: map.start(),
            items: Vec::new(),
            inventory: Vec::new(),
            total_items: 0,
            message: String::new(),
            ended: None,
        }
    }

    pub fn start(&mut self, items: &[Item], start: Position) {
        self.player = start;
        self.items = items
            .iter()
            .filter(|item| !item.collected)
            .filter_map(|item| Some((item.name.clone(), item.position?)))
            .collect();
        self.total_items = items.len();
        self.message = self.texts.welcome(items.len());
        self.ended = None;
    }

    pub fn move_player(&mut self, position: Position) {
        self.player = position;
    }

    pub fn collect(&mut self, name: &str, position: Position) {
        self.items
            .retain(|(item, pos)| !(item == name && *pos == position));
        self.inventory.push(name.to_string());
        self.message = format!("{}{}", self.texts.item_text, name);
    }

    pub fn end(&mut self, won: bool) {
        self.ended = Some(won);
        self.message = self.texts.ending(won).to_string();
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.inventory.clear();
        self.message.clear();
        self.ended = None;
    }

    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn show_inventory(&self) -> bool {
        self.texts.inventory
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `Some(won)` once a playthrough has ended, until the next reset.
    pub fn ended(&self) -> Option<bool> {
        self.ended
    }

    pub fn end_text(&self) -> &str {
        &self.texts.end_text
    }

    /// The cell at `pos`, with the player drawn over items and items over tiles.
    pub fn cell(&self, pos: Position) -> Cell {
        if pos == self.player {
            return Cell::Player;
        }
        if let Some((name, _)) = self.items.iter().find(|(_, item_pos)| *item_pos == pos) {
            return Cell::Item(item_glyph(name));
        }
        match self.tiles.get(pos.x, pos.y) {
            Some(Tile::Wall) => Cell::Wall,
            Some(Tile::Floor | Tile::Start) => Cell::Floor,
            Some(Tile::Exit) => Cell::Exit,
            Some(Tile::Void) | None => Cell::Void,
        }
    }

    /// The map as text, one string per row.
    pub fn rows(&self) -> Vec<String> {
        let mut rows = vec![String::with_capacity(self.width()); self.height()];
        for (pos, _) in self.tiles.enumerate() {
            rows[pos.y].push(self.cell(pos).glyph());
        }
        rows
    }
}
