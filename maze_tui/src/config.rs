use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use maze_core::config::GameConfig;
use serde::{Deserialize, Serialize};

/// Configuration file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "maze.toml";

/// Which frontend draws the game and reads the player's input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// Full-screen terminal UI.
    #[default]
    Tui,
    /// Line-oriented text on stdin/stdout.
    Text,
}

/// Frontend settings and the texts shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub backend: DisplayKind,
    /// Show the inventory panel with collected items.
    pub inventory: bool,
    /// `{count}` is replaced by the number of items.
    pub welcome_text: String,
    /// Prefix for the message shown when an item is picked up.
    pub item_text: String,
    pub victory_text: String,
    pub defeat_text: String,
    pub end_text: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            backend: DisplayKind::default(),
            inventory: true,
            welcome_text: "Collect the {count} items, then find the keeper!".into(),
            item_text: "You found: ".into(),
            victory_text: "You put the keeper to sleep and escaped!".into(),
            defeat_text: "The keeper caught you before you were ready...".into(),
            end_text: "Play again? (y/n)".into(),
        }
    }
}

impl DisplayConfig {
    pub fn welcome(&self, count: usize) -> String {
        self.welcome_text.replace("{count}", &count.to_string())
    }

    pub fn ending(&self, won: bool) -> &str {
        if won {
            &self.victory_text
        } else {
            &self.defeat_text
        }
    }
}

/// Everything the launcher reads from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used if present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    log::debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.game.validate()?;
        Ok(config)
    }
}
