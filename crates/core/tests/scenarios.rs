use std::collections::{BTreeSet, VecDeque};

use arena_core::mapgen::apply_symmetry;
use arena_core::{Layout, Level, RawOptions, SymmetryMode, generate_layout};

fn connected(level: &Level) -> bool {
    let open = level.grid.open_positions();
    let Some(&start) = open.first() else {
        return false;
    };
    let mut frontier = VecDeque::from([start]);
    let mut seen = BTreeSet::from([start]);
    while let Some(pos) = frontier.pop_front() {
        for next in level.grid.neighbors4(pos) {
            if level.grid.is_open(next) && seen.insert(next) {
                frontier.push_back(next);
            }
        }
    }
    seen.len() == open.len()
}

fn solidity_and_heights(layout: &Layout) -> Vec<(bool, Option<f64>)> {
    layout.levels[0].grid.cells().iter().map(|cell| (cell.solid, cell.elevation)).collect()
}

#[test]
fn test_scenario_seed_42_single_floor() {
    let raw = RawOptions::new()
        .with("seed", "42")
        .with("gridWidth", 32)
        .with("gridHeight", 24)
        .with("rooms", 10)
        .with("maxRoomSize", 8)
        .with("corridorStyle", "L")
        .with("symmetry", "None")
        .with("wallHeight", 4)
        .with("floors", 1);
    let layout = generate_layout(&raw);

    assert_eq!(layout.levels.len(), 1);
    let level = &layout.levels[0];
    assert_eq!((level.width, level.height), (32, 24));
    assert_eq!(level.rooms.len(), 10);
    assert!(connected(level));
    for room in &level.rooms {
        assert!(level.grid.is_open(room.center));
    }

    let again = generate_layout(&raw);
    assert_eq!(solidity_and_heights(&layout), solidity_and_heights(&again));
}

#[test]
fn test_scenario_single_room_on_tiny_grid() {
    let raw = RawOptions::new().with("rooms", 1).with("gridWidth", 8).with("gridHeight", 8);
    let layout = generate_layout(&raw);
    let level = &layout.levels[0];

    assert_eq!(level.rooms.len(), 1);
    let room = level.rooms[0];
    assert_eq!(level.grid.open_positions().len(), room.width * room.height);
    for pos in level.grid.open_positions() {
        assert!(room.contains(pos));
        assert!(level.cell(pos).is_some_and(|cell| !cell.has_ramp()));
    }
}

#[test]
fn test_scenario_every_level_has_walkable_space() {
    for seed in 1..=20 {
        let raw = RawOptions::new()
            .with("seed", seed)
            .with("gridWidth", 8)
            .with("gridHeight", 8)
            .with("rooms", 96)
            .with("maxRoomSize", 24);
        let layout = generate_layout(&raw);
        let level = &layout.levels[0];
        assert!(!level.rooms.is_empty());
        assert!(!level.grid.open_positions().is_empty());
        assert!(connected(level), "seed {seed}");
    }
}

#[test]
fn test_scenario_standing_height_follows_level_stack() {
    let raw = RawOptions::new().with("floors", 2).with("wallHeight", 5).with("seed", "standing");
    let layout = generate_layout(&raw);
    let upper = &layout.levels[1];
    let room = upper.rooms[0];
    let cell = upper.cell(room.center).expect("room centre lies on the grid");
    let height = upper
        .standing_height(f64::from(room.center.x) + 0.5, f64::from(room.center.y) + 0.5)
        .expect("room centre is walkable");
    assert_eq!(height, 5.0 + cell.floor_height());
    assert_eq!(upper.standing_height(0.5, 0.5), None);
}

#[test]
fn test_scenario_symmetry_is_idempotent_on_generated_levels() {
    for mode in ["x", "bottom", "y", "right", "xy", "topright", "bottomleft", "bottomright"] {
        let raw = RawOptions::new().with("symmetry", mode).with("seed", "sym").with("floors", 2);
        let mut layout = generate_layout(&raw);
        let before = layout.clone();
        apply_symmetry(&mut layout.levels, SymmetryMode::from_keyword(mode));
        assert_eq!(layout, before, "mode {mode}");
    }
}

#[test]
fn test_scenario_inflated_rooms_never_intersect() {
    for (seed, arena) in [(16, "Halo"), (3, "CS2"), (9, "Quake")] {
        let raw = RawOptions::new()
            .with("seed", seed)
            .with("type", arena)
            .with("rooms", 4)
            .with("gridWidth", 12)
            .with("gridHeight", 12)
            .with("floors", 3);
        for level in &generate_layout(&raw).levels {
            for (index, a) in level.rooms.iter().enumerate() {
                for b in &level.rooms[index + 1..] {
                    assert!(!a.inflated_overlaps(b), "{arena} seed {seed}: {a:?} meets {b:?}");
                }
            }
        }
    }
}

#[test]
fn test_scenario_spawns_land_on_open_uncovered_cells() {
    let raw = RawOptions::new().with("spawnAmount", 16).with("coverProbability", 100);
    let layout = generate_layout(&raw);
    let level = &layout.levels[0];
    let spawns = level.spawn_positions();
    assert!(!spawns.is_empty());
    for pos in spawns {
        let cell = level.cell(pos).expect("spawn on grid");
        assert!(!cell.solid && !cell.cover);
    }
}
