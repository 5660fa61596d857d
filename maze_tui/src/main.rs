mod board;
mod config;
mod terminal;
mod text;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use maze_core::{
    game::{GameState, RunSummary},
    map::MapGrid,
};

use crate::{
    board::Board,
    config::{AppConfig, DisplayKind},
    terminal::TerminalUi,
    text::TextUi,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Map file to load
    #[arg(short, long, value_name = "MAP_FILE", default_value = "maps/map1.txt")]
    map: PathBuf,

    /// Configuration file (TOML); defaults to ./maze.toml when present
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Display backend, overrides the configuration file
    #[arg(short, long, value_enum)]
    display: Option<DisplayKind>,

    /// Seed for item placement, for reproducible games
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref())?;
    let map_text = fs::read_to_string(&args.map)
        .with_context(|| format!("Failed to read map file {}", args.map.display()))?;
    let map = MapGrid::load(&map_text, &config.game.symbols)
        .with_context(|| format!("Invalid map file {}", args.map.display()))?;
    if !map.exit_reachable() {
        warn!(
            "Exit {} cannot be reached from start {}, this map cannot be won",
            map.exit(),
            map.start()
        );
    }

    let board = Board::new(&map, config.display.clone());
    let mut game = match args.seed {
        Some(seed) => GameState::seeded(map, &config.game, seed),
        None => GameState::from_os_rng(map, &config.game),
    }
    .context("Failed to set up game")?;

    let backend = args.display.unwrap_or(config.display.backend);
    info!("Starting game with {:?} display", backend);
    let summary = match backend {
        DisplayKind::Text => {
            let mut ui = TextUi::new(io::stdin().lock(), io::stdout(), board);
            game.run_frontend(&mut ui)?
        }
        DisplayKind::Tui => {
            // Dropped before printing so the terminal is restored first.
            let mut ui = TerminalUi::new(board).context("Failed to set up terminal")?;
            game.run_frontend(&mut ui)?
        }
    };

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    if summary.games_played == 0 {
        return;
    }
    println!(
        "Played {} game(s): {} won, {} lost.",
        summary.games_played, summary.wins, summary.losses
    );
}
