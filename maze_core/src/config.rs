use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Represents errors in a game configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Symbol '{symbol}' is assigned to more than one tile class")]
    DuplicateSymbol { symbol: char },
    #[error("Symbol '{symbol}' must be upper-case, map characters are upper-cased before matching")]
    LowercaseSymbol { symbol: char },
    #[error("Item name '{name}' appears more than once")]
    DuplicateItem { name: String },
}

/// The characters a map file uses for each tile class.
///
/// Matching is case-insensitive: map characters are upper-cased before being
/// compared, so letter symbols here must be upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolTable {
    pub wall: char,
    pub floor: char,
    pub start: char,
    pub exit: char,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable {
            wall: '#',
            floor: '.',
            start: 'S',
            exit: 'K',
        }
    }
}

impl SymbolTable {
    /// Checks that every tile class has its own upper-case symbol.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for symbol in [self.wall, self.floor, self.start, self.exit] {
            if symbol.is_lowercase() {
                return Err(ConfigError::LowercaseSymbol { symbol });
            }
            if !seen.insert(symbol) {
                return Err(ConfigError::DuplicateSymbol { symbol });
            }
        }
        Ok(())
    }
}

/// Immutable configuration handed to map loading and game construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub symbols: SymbolTable,
    /// Names of the items to collect, in display order.
    pub item_names: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            symbols: SymbolTable::default(),
            item_names: vec!["Needle".into(), "Tube".into(), "Ether".into()],
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.symbols.validate()?;
        let mut seen = HashSet::new();
        for name in &self.item_names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateItem { name: name.clone() });
            }
        }
        Ok(())
    }
}
