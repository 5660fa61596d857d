//! Property checks for map parsing and item placement.

use std::collections::HashSet;

use maze_core::{config::GameConfig, game::GameState, map::MapGrid};
use proptest::prelude::*;

/// Rows of arbitrary map characters with a start and exit spliced in.
fn map_text() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[#.x ?]{1,12}", 1..10),
        any::<prop::sample::Index>(),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(mut rows, start_row, exit_row)| {
            let s = start_row.index(rows.len());
            rows[s].insert(0, 'S');
            let e = exit_row.index(rows.len());
            rows[e].push('k');
            rows.join("\n")
        })
}

proptest! {
    #[test]
    fn walkable_and_walls_are_disjoint(text in map_text()) {
        let map = MapGrid::load(&text, &GameConfig::default().symbols).unwrap();
        prop_assert!(map.walkable().is_disjoint(map.walls()));
        prop_assert!(map.walkable().contains(&map.start()));
        prop_assert!(map.walkable().contains(&map.exit()));
        prop_assert_ne!(map.start(), map.exit());
        prop_assert!(map.walkable().iter().chain(map.walls()).all(|p| p.x < map.width() && p.y < map.height()));
    }

    #[test]
    fn placement_yields_distinct_eligible_tiles(text in map_text(), seed in any::<u64>(), count in 0usize..6) {
        let map = MapGrid::load(&text, &GameConfig::default().symbols).unwrap();
        let available = map.placement_candidates().len();
        let config = GameConfig {
            item_names: (0..count).map(|i| format!("item{i}")).collect(),
            ..GameConfig::default()
        };
        match GameState::seeded(map, &config, seed) {
            Ok(game) => {
                let positions: HashSet<_> = game.items().iter().filter_map(|i| i.position).collect();
                prop_assert_eq!(positions.len(), count);
                prop_assert!(!positions.contains(&game.map().start()));
                prop_assert!(!positions.contains(&game.map().exit()));
            }
            Err(_) => prop_assert!(available < count),
        }
    }
}
