//! End-to-end playthroughs driven through the input and display ports.

use maze_core::{
    Direction, Position,
    config::GameConfig,
    game::{GameError, GameState, Phase, RunSummary},
    map::MapGrid,
    ports::{Command, DisplayEvent, RecordingDisplay, ScriptedInput},
};

fn game(text: &str, items: &[&str], seed: u64) -> Result<GameState, GameError> {
    let config = GameConfig {
        item_names: items.iter().map(|n| n.to_string()).collect(),
        ..GameConfig::default()
    };
    let map = MapGrid::load(text, &config.symbols)?;
    GameState::seeded(map, &config, seed)
}

#[test]
fn empty_inventory_wins_on_reaching_exit() -> Result<(), GameError> {
    let mut game = game("S.\n.K", &[], 0)?;
    let mut input = ScriptedInput::moves([Direction::Right, Direction::Down]);
    let mut display = RecordingDisplay::new();

    let summary = game.run(&mut input, &mut display)?;

    assert_eq!(
        summary,
        RunSummary {
            games_played: 1,
            wins: 1,
            losses: 0
        }
    );
    assert_eq!(
        display.events,
        vec![
            DisplayEvent::Start {
                items: vec![],
                start: Position::new(0, 0),
                exit: Position::new(1, 1),
            },
            DisplayEvent::MovePlayer(Position::new(1, 0)),
            DisplayEvent::MovePlayer(Position::new(1, 1)),
            DisplayEvent::ShowEnd { won: true },
        ]
    );
    assert_eq!(game.phase(), Phase::Terminated);
    Ok(())
}

#[test]
fn item_on_path_is_collected_before_winning() -> Result<(), GameError> {
    let mut game = game("S.\n.K", &["Needle"], 0)?;
    game.place_items_at(&[Position::new(1, 0)])?;
    let mut input = ScriptedInput::moves([Direction::Right, Direction::Down]);
    let mut display = RecordingDisplay::new();

    let summary = game.run(&mut input, &mut display)?;

    assert_eq!(summary.wins, 1);
    assert_eq!(
        &display.events[1..],
        &[
            DisplayEvent::MovePlayer(Position::new(1, 0)),
            DisplayEvent::ItemCollected {
                name: "Needle".to_string(),
                position: Position::new(1, 0),
            },
            DisplayEvent::MovePlayer(Position::new(1, 1)),
            DisplayEvent::ShowEnd { won: true },
        ]
    );
    Ok(())
}

#[test]
fn skipping_an_item_loses() -> Result<(), GameError> {
    let mut game = game("S.\n.K", &["Needle"], 0)?;
    game.place_items_at(&[Position::new(1, 0)])?;
    let mut input = ScriptedInput::moves([Direction::Down, Direction::Right]);
    let mut display = RecordingDisplay::new();

    let summary = game.run(&mut input, &mut display)?;

    assert_eq!(summary.losses, 1);
    assert_eq!(display.endings(), vec![false]);
    assert!(display.collected_names().is_empty());
    Ok(())
}

#[test]
fn quit_first_makes_no_moves() -> Result<(), GameError> {
    let mut game = game("S.\n.K", &[], 0)?;
    let mut input = ScriptedInput::new([Command::Quit]);
    let mut display = RecordingDisplay::new();

    game.run(&mut input, &mut display)?;

    assert_eq!(display.move_count(), 0);
    assert_eq!(game.phase(), Phase::Terminated);
    assert!(!game.is_running());
    Ok(())
}

#[test]
fn invalid_moves_are_retried_until_quit() -> Result<(), GameError> {
    let mut game = game("#S#\n#.#\n#K#", &[], 0)?;
    let mut commands = vec![Command::Move(Direction::Left); 10_000];
    commands.push(Command::Move(Direction::Up));
    commands.push(Command::Quit);
    let mut input = ScriptedInput::new(commands);
    let mut display = RecordingDisplay::new();

    let summary = game.run(&mut input, &mut display)?;

    assert_eq!(summary, RunSummary::default());
    assert_eq!(display.move_count(), 0);
    assert_eq!(game.player().position, Position::new(1, 0));
    Ok(())
}

#[test]
fn replay_resets_and_plays_again() -> Result<(), GameError> {
    let mut game = game("S.K", &["Tube"], 9)?;
    let mut input = ScriptedInput::moves([
        Direction::Right,
        Direction::Right,
        Direction::Right,
        Direction::Right,
    ])
    .with_replays([true, false]);
    let mut display = RecordingDisplay::new();

    let summary = game.run(&mut input, &mut display)?;

    assert_eq!(
        summary,
        RunSummary {
            games_played: 2,
            wins: 2,
            losses: 0
        }
    );
    assert_eq!(display.collected_names(), vec!["Tube", "Tube"]);
    let resets = display
        .events
        .iter()
        .filter(|e| matches!(e, DisplayEvent::Reset))
        .count();
    assert_eq!(resets, 1);
    assert_eq!(game.phase(), Phase::Terminated);
    Ok(())
}

#[test]
fn replay_placement_is_deterministic_under_seed() -> Result<(), GameError> {
    let text = "S....\n.....\n....K";
    let mut first = game(text, &["A", "B"], 11)?;
    let mut second = game(text, &["A", "B"], 11)?;
    let mut display = RecordingDisplay::new();

    first.reset(&mut display)?;
    second.reset(&mut display)?;

    assert_eq!(first.items(), second.items());
    assert!(first.items().iter().all(|item| !item.collected));
    Ok(())
}
